use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, Write};
use std::path::PathBuf;

use npyfile::dtype::ElementType;
use npyfile::layout::MemoryOrder;
use npyfile::path::npy_path;
use npyfile::slice::SliceView;
use npyfile::writer::{NpyWriter, WriterConfig};

use super::config::Config;
use super::{EndianArg, OrderArg};

/// Command-line arguments of `npyfile stack`
pub struct StackArgs {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub dtype: Option<String>,
    pub shape: Option<Vec<usize>>,
    pub order: Option<OrderArg>,
    pub endian: Option<EndianArg>,
    pub config: Option<PathBuf>,
    pub header_len: Option<u16>,
    pub buffer_capacity: Option<usize>,
}

/// Frame geometry and writer settings after merging flags over the config file
#[derive(Debug)]
struct StackPlan {
    element_type: ElementType,
    shape: Vec<usize>,
    order: MemoryOrder,
    writer_config: WriterConfig,
}

impl StackPlan {
    fn resolve(args: &StackArgs, config: &Config) -> Result<Self> {
        let dtype = args
            .dtype
            .as_deref()
            .or(config.stack.dtype.as_deref())
            .context("No element type given; pass --dtype or set [stack] dtype")?;
        let mut element_type: ElementType = dtype
            .parse()
            .with_context(|| format!("Invalid element type: {}", dtype))?;
        if let Some(endian) = args.endian.or(config.stack.endian) {
            element_type = ElementType::new(element_type.dtype(), endian.into());
        }

        let shape = args
            .shape
            .clone()
            .or_else(|| config.stack.shape.clone())
            .context("No frame shape given; pass --shape or set [stack] shape")?;

        let order = args.order.or(config.stack.order).unwrap_or_default();

        let mut writer_config = config.writer_config();
        if let Some(header_len) = args.header_len {
            writer_config.header_len = header_len;
        }
        if let Some(buffer_capacity) = args.buffer_capacity {
            writer_config.buffer_capacity = buffer_capacity;
        }
        writer_config
            .validate()
            .context("Invalid writer configuration")?;

        Ok(Self {
            element_type,
            shape,
            order: order.into(),
            writer_config,
        })
    }

    /// Bytes per frame
    fn frame_len(&self) -> Result<usize> {
        let len = self
            .shape
            .iter()
            .try_fold(self.element_type.size(), |acc, &dim| acc.checked_mul(dim))
            .with_context(|| format!("Frame shape {:?} is too large", self.shape))?;
        if len == 0 {
            bail!("Frames of shape {:?} hold no data", self.shape);
        }
        Ok(len)
    }
}

/// Stack raw frame files into one .npy file
pub fn run(args: StackArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let plan = StackPlan::resolve(&args, &config)?;
    let frame_len = plan.frame_len()?;

    for input in &args.inputs {
        if !input.exists() {
            bail!("Input file does not exist: {}", input.display());
        }
    }

    let output = npy_path(&args.output);
    info!("npyfile - Stack raw frames");
    info!("==========================");
    info!("Inputs: {} file(s)", args.inputs.len());
    info!("Output: {}", output.display());
    info!(
        "Frame:  {} {:?}, {} order ({} bytes)",
        plan.element_type, plan.shape, plan.order, frame_len
    );
    if plan.order.classify_dense(&plan.shape).is_fortran() {
        warn!("Column-major frames: loading the whole file will not index frames on axis 0");
    }

    let mut writer = NpyWriter::create_with_config(&output, plan.writer_config.clone())
        .context("Failed to create npy writer")?;

    let mut frame = vec![0u8; frame_len];
    for input in &args.inputs {
        let file = File::open(input)
            .with_context(|| format!("Failed to open input file: {}", input.display()))?;
        let frames = stack_frames(&mut writer, BufReader::new(file), &plan, &mut frame)
            .with_context(|| format!("Failed to stack {}", input.display()))?;
        info!("  {}: {} frame(s)", input.display(), frames);
    }

    let stats = writer.close().context("Failed to finalize npy file")?;

    info!("Stacking complete!");
    info!("  Output file: {}", output.display());
    info!("  {}", stats);
    if stats.slices_written == 0 {
        info!("  No frames found; output file left empty");
    }

    Ok(())
}

/// Append every frame in `reader` to `writer`, returning the frame count.
///
/// `frame` is the reusable read buffer and must be exactly one frame long.
fn stack_frames<R: Read, W: Write + Seek>(
    writer: &mut NpyWriter<W>,
    mut reader: R,
    plan: &StackPlan,
    frame: &mut [u8],
) -> Result<u64> {
    let mut frames = 0u64;
    loop {
        let filled = read_frame(&mut reader, frame)?;
        if filled == 0 {
            return Ok(frames);
        }
        if filled < frame.len() {
            bail!(
                "Trailing {} bytes do not form a complete frame of {} bytes",
                filled,
                frame.len()
            );
        }

        let slice = SliceView::new(plan.element_type, plan.shape.clone(), plan.order, frame)?;
        writer.write(&slice)?;
        frames += 1;
        if frames % 1000 == 0 {
            debug!("  Stacked {} frames...", frames);
        }
    }
}

/// Fill `buf` from `reader`, stopping early only at end of input
fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use npyfile::dtype::{DType, Endian};
    use std::io::Cursor;

    fn args() -> StackArgs {
        StackArgs {
            inputs: vec![PathBuf::from("frames.raw")],
            output: PathBuf::from("out"),
            dtype: None,
            shape: None,
            order: None,
            endian: None,
            config: None,
            header_len: None,
            buffer_capacity: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::from_str(
            r#"
            [writer]
            header_len = 118

            [stack]
            dtype = "u16"
            shape = [4, 4]
            order = "f"
            "#,
        )
        .unwrap();

        let args = StackArgs {
            shape: Some(vec![2, 3]),
            endian: Some(EndianArg::Big),
            ..args()
        };
        let plan = StackPlan::resolve(&args, &config).unwrap();

        assert_eq!(plan.element_type, ElementType::new(DType::U16, Endian::Big));
        assert_eq!(plan.shape, vec![2, 3]);
        assert_eq!(plan.order, MemoryOrder::ColumnMajor);
        assert_eq!(plan.writer_config, WriterConfig::compact());
        assert_eq!(plan.frame_len().unwrap(), 12);
    }

    #[test]
    fn test_missing_dtype_or_shape() {
        let config = Config::default();
        assert!(StackPlan::resolve(&args(), &config).is_err());

        let only_dtype = StackArgs {
            dtype: Some("f32".to_string()),
            ..args()
        };
        assert!(StackPlan::resolve(&only_dtype, &config).is_err());
    }

    #[test]
    fn test_misaligned_header_len_rejected() {
        let args = StackArgs {
            dtype: Some("u8".to_string()),
            shape: Some(vec![4]),
            header_len: Some(100),
            ..args()
        };
        assert!(StackPlan::resolve(&args, &Config::default()).is_err());
    }

    #[test]
    fn test_empty_frames_rejected() {
        let args = StackArgs {
            dtype: Some("u8".to_string()),
            shape: Some(vec![4, 0]),
            ..args()
        };
        let plan = StackPlan::resolve(&args, &Config::default()).unwrap();
        assert!(plan.frame_len().is_err());
    }

    #[test]
    fn test_stack_frames_from_reader() {
        let args = StackArgs {
            dtype: Some("<u2".to_string()),
            shape: Some(vec![2]),
            ..args()
        };
        let plan = StackPlan::resolve(&args, &Config::default()).unwrap();
        let mut frame = vec![0u8; plan.frame_len().unwrap()];

        let mut writer = NpyWriter::new(Cursor::new(Vec::new()), WriterConfig::compact()).unwrap();
        let input: Vec<u8> = (0u8..12).collect();
        let frames = stack_frames(&mut writer, &input[..], &plan, &mut frame).unwrap();
        assert_eq!(frames, 3);

        let bytes = writer.into_inner().unwrap().into_inner();
        assert_eq!(&bytes[128..], input.as_slice());
    }

    #[test]
    fn test_partial_frame_is_an_error() {
        let args = StackArgs {
            dtype: Some("uint8".to_string()),
            shape: Some(vec![4]),
            ..args()
        };
        let plan = StackPlan::resolve(&args, &Config::default()).unwrap();
        let mut frame = vec![0u8; 4];

        let mut writer = NpyWriter::new(Cursor::new(Vec::new()), WriterConfig::compact()).unwrap();
        let input = [1u8, 2, 3, 4, 5, 6];
        let err = stack_frames(&mut writer, &input[..], &plan, &mut frame).unwrap_err();
        assert!(err.to_string().contains("Trailing 2 bytes"));
        assert_eq!(writer.slices_written(), 1);
    }
}
