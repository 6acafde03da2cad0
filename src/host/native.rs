//! # 本地宿主实现
//!
//! 使用 `image` crate 完成解码、缩放与编码，按节点图求值：
//! 合成输出 ← 缩放 ← 图像源。
//!
//! ## 输出尺寸
//! - 未设置渲染尺寸：输出为缩放后的图像尺寸
//! - 设置了渲染尺寸：输出画幅为 渲染尺寸 × 百分比，缩放结果被拉伸填满画幅
//! - 正比例缩放后每个轴至少 1 像素，比例为 0 时渲染失败
//!
//! ## 依赖关系
//! - 实现 `host::Host`
//! - 被 `commands/convert.rs` 使用

use crate::error::{ConverterError, Result};
use crate::host::{
    scaled_axis, Host, ImageId, NodeData, NodeGraph, NodeId, NodeKind, RenderSettings,
};
use crate::models::OutputFormat;

use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// 缩放使用的重采样滤波器
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// 图像库条目
#[derive(Debug)]
struct StoredImage {
    filepath: PathBuf,
    /// 路径变更后在 reload 之前为 None
    pixels: Option<DynamicImage>,
}

/// 基于 `image` crate 的宿主
#[derive(Debug, Default)]
pub struct NativeHost {
    graph: NodeGraph,
    images: Vec<StoredImage>,
    settings: RenderSettings,
}

impl NativeHost {
    pub fn new(settings: RenderSettings) -> Self {
        NativeHost {
            graph: NodeGraph::new(),
            images: Vec::new(),
            settings,
        }
    }

    /// 使用已有节点图（例如从节点图文件加载）
    pub fn with_graph(mut self, graph: NodeGraph) -> Self {
        self.graph = graph;
        self
    }

    fn stored(&self, image: ImageId) -> Result<&StoredImage> {
        self.images.get(image).ok_or_else(|| unknown_image(image))
    }

    fn stored_mut(&mut self, image: ImageId) -> Result<&mut StoredImage> {
        self.images.get_mut(image).ok_or_else(|| unknown_image(image))
    }

    /// 从合成输出节点开始求值
    fn composite(&self) -> std::result::Result<DynamicImage, String> {
        let output = self
            .graph
            .find_kind(NodeKind::CompositeOutput)
            .ok_or("node graph has no composite output")?;

        let scaled = self.evaluate_input(output)?;

        let (width, height) = match self.settings.frame_size() {
            Some(frame) => frame,
            None => (scaled.width(), scaled.height()),
        };
        if width == 0 || height == 0 {
            return Err(format!("degenerate output size {}x{}", width, height));
        }

        if (width, height) == (scaled.width(), scaled.height()) {
            Ok(scaled)
        } else {
            Ok(scaled.resize_exact(width, height, RESAMPLE_FILTER))
        }
    }

    fn evaluate_input(&self, id: NodeId) -> std::result::Result<DynamicImage, String> {
        let upstream = self.graph.upstream(id).ok_or_else(|| {
            let name = self.graph.node(id).map(|n| n.name.as_str()).unwrap_or("?");
            format!("input of node '{}' is not connected", name)
        })?;
        self.evaluate(upstream)
    }

    fn evaluate(&self, id: NodeId) -> std::result::Result<DynamicImage, String> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| format!("missing node #{}", id))?;

        match &node.data {
            NodeData::ImageSource { image } => {
                let image = (*image).ok_or_else(|| format!("node '{}' has no image", node.name))?;
                let stored = self.images.get(image).ok_or("image handle is invalid")?;
                stored
                    .pixels
                    .clone()
                    .ok_or_else(|| format!("image {} is not loaded", stored.filepath.display()))
            }
            NodeData::Scale { x, y } => {
                let input = self.evaluate_input(id)?;
                let width = scaled_axis(input.width(), *x);
                let height = scaled_axis(input.height(), *y);
                if width == 0 || height == 0 {
                    return Err(format!("scale {}x{} yields an empty image", x, y));
                }
                if (width, height) == (input.width(), input.height()) {
                    Ok(input)
                } else {
                    Ok(input.resize_exact(width, height, RESAMPLE_FILTER))
                }
            }
            NodeData::CompositeOutput => self.evaluate_input(id),
        }
    }
}

impl Host for NativeHost {
    fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    fn load_image(&mut self, path: &Path) -> Result<ImageId> {
        let pixels = decode(path)?;
        self.images.push(StoredImage {
            filepath: path.to_path_buf(),
            pixels: Some(pixels),
        });
        Ok(self.images.len() - 1)
    }

    fn set_image_filepath(&mut self, image: ImageId, path: &Path) -> Result<()> {
        let stored = self.stored_mut(image)?;
        if stored.filepath != path {
            stored.filepath = path.to_path_buf();
            stored.pixels = None;
        }
        Ok(())
    }

    fn reload_image(&mut self, image: ImageId) -> Result<()> {
        let stored = self.stored_mut(image)?;
        stored.pixels = Some(decode(&stored.filepath)?);
        Ok(())
    }

    fn image_size(&self, image: ImageId) -> Result<(u32, u32)> {
        let stored = self.stored(image)?;
        stored
            .pixels
            .as_ref()
            .map(|p| (p.width(), p.height()))
            .ok_or_else(|| {
                ConverterError::InvalidArgument(format!(
                    "Image is not loaded: {}",
                    stored.filepath.display()
                ))
            })
    }

    fn render_settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn render_settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    fn render(&mut self, write_still: bool) -> Result<PathBuf> {
        let output_path = self.settings.output_path.clone();
        let render_error = |reason: String| ConverterError::RenderIo {
            path: output_path.display().to_string(),
            reason,
        };

        let result = self.composite().map_err(render_error)?;

        if write_still {
            let format = self.settings.format;
            prepare_for(format, result)
                .save_with_format(&output_path, format.image_format())
                .map_err(|e| render_error(e.to_string()))?;
        }

        Ok(output_path)
    }
}

fn decode(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| ConverterError::ImageDecode {
        path: path.display().to_string(),
        source: e,
    })
}

fn unknown_image(image: ImageId) -> ConverterError {
    ConverterError::InvalidArgument(format!("Unknown image handle #{}", image))
}

/// 转换为编码器支持的像素格式
fn prepare_for(format: OutputFormat, image: DynamicImage) -> DynamicImage {
    match format {
        OutputFormat::Png | OutputFormat::Tiff => image,
        OutputFormat::Tga => DynamicImage::ImageRgba8(image.to_rgba8()),
        OutputFormat::Jpeg | OutputFormat::Bmp => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
            .save(path)
            .unwrap();
    }

    fn wire(host: &mut NativeHost, image: ImageId, scale: f64) {
        let graph = host.graph_mut();
        let src = graph.add_node(NodeKind::ImageSource);
        let sc = graph.add_node(NodeKind::Scale);
        let out = graph.add_node(NodeKind::CompositeOutput);
        graph.connect(src, sc).unwrap();
        graph.connect(sc, out).unwrap();
        graph.node_mut(src).unwrap().data = NodeData::ImageSource { image: Some(image) };
        graph.node_mut(sc).unwrap().data = NodeData::Scale { x: scale, y: scale };
    }

    #[test]
    fn test_render_scaled_without_frame() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        write_png(&src, 40, 20);

        let mut host = NativeHost::new(RenderSettings::default());
        let image = host.load_image(&src).unwrap();
        wire(&mut host, image, 0.5);

        let out = dir.path().join("out.png");
        host.render_settings_mut().output_path = out.clone();
        host.render(true).unwrap();

        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (20, 10));
    }

    #[test]
    fn test_render_fills_frame() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        write_png(&src, 40, 20);

        let mut settings = RenderSettings::default();
        settings.set_resolution(64, 48, 50);
        settings.format = OutputFormat::Jpeg;
        let mut host = NativeHost::new(settings);
        let image = host.load_image(&src).unwrap();
        wire(&mut host, image, 1.0);

        let out = dir.path().join("out.jpg");
        host.render_settings_mut().output_path = out.clone();
        host.render(true).unwrap();

        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (32, 24));
    }

    #[test]
    fn test_tiny_image_at_one_percent_renders_one_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("dot.png");
        write_png(&src, 1, 1);
        let wide = dir.path().join("strip.png");
        write_png(&wide, 300, 20);

        let mut host = NativeHost::new(RenderSettings::default());
        let image = host.load_image(&src).unwrap();
        wire(&mut host, image, 0.01);

        let out = dir.path().join("dot_out.png");
        host.render_settings_mut().output_path = out.clone();
        host.render(true).unwrap();
        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (1, 1));

        host.set_image_filepath(image, &wide).unwrap();
        host.reload_image(image).unwrap();
        let out = dir.path().join("strip_out.png");
        host.render_settings_mut().output_path = out.clone();
        host.render(true).unwrap();
        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (3, 1));
    }

    #[test]
    fn test_zero_scale_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        write_png(&src, 4, 4);

        let mut host = NativeHost::new(RenderSettings::default());
        let image = host.load_image(&src).unwrap();
        wire(&mut host, image, 0.0);
        host.render_settings_mut().output_path = dir.path().join("out.png");

        let err = host.render(true).unwrap_err();
        assert!(matches!(err, ConverterError::RenderIo { .. }));
    }

    #[test]
    fn test_filepath_change_requires_reload() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_png(&a, 8, 8);
        write_png(&b, 16, 4);

        let mut host = NativeHost::new(RenderSettings::default());
        let image = host.load_image(&a).unwrap();
        assert_eq!(host.image_size(image).unwrap(), (8, 8));

        host.set_image_filepath(image, &b).unwrap();
        assert!(host.image_size(image).is_err());

        host.reload_image(image).unwrap();
        assert_eq!(host.image_size(image).unwrap(), (16, 4));
    }

    #[test]
    fn test_render_unconnected_graph_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = NativeHost::new(RenderSettings::default());
        host.graph_mut().add_node(NodeKind::CompositeOutput);
        host.render_settings_mut().output_path = dir.path().join("out.png");

        let err = host.render(true).unwrap_err();
        assert!(matches!(err, ConverterError::RenderIo { .. }));
    }

    #[test]
    fn test_render_into_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        write_png(&src, 4, 4);

        let mut host = NativeHost::new(RenderSettings::default());
        let image = host.load_image(&src).unwrap();
        wire(&mut host, image, 1.0);
        host.render_settings_mut().output_path = dir.path().join("missing").join("out.png");

        let err = host.render(true).unwrap_err();
        assert!(matches!(err, ConverterError::RenderIo { .. }));
    }

    #[test]
    fn test_load_non_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image").unwrap();

        let mut host = NativeHost::new(RenderSettings::default());
        let err = host.load_image(&path).unwrap_err();
        assert!(matches!(err, ConverterError::ImageDecode { .. }));
    }
}
