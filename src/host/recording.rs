//! # 记录型测试宿主
//!
//! 不解码真实图像：图像尺寸取自预先登记的文件名表，
//! 每次渲染记录当时的渲染设置与节点状态，可在第 N 次渲染时注入失败。

use crate::error::{ConverterError, Result};
use crate::host::{Host, ImageId, NodeData, NodeGraph, NodeKind, RenderSettings};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 一次渲染调用的快照
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub source: PathBuf,
    pub output_path: PathBuf,
    pub resolution: Option<(u32, u32)>,
    pub resolution_percentage: u32,
    pub scale: (f64, f64),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    graph: NodeGraph,
    settings: RenderSettings,
    sizes: HashMap<String, (u32, u32)>,
    images: Vec<(PathBuf, Option<(u32, u32)>)>,
    pub loads: usize,
    pub reloads: usize,
    pub renders: Vec<RenderRecord>,
    /// 第 N 次（从 0 开始）渲染返回错误
    pub fail_at: Option<usize>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记文件名对应的像素尺寸；未登记的文件默认 64x64
    pub fn with_size(mut self, filename: &str, width: u32, height: u32) -> Self {
        self.sizes.insert(filename.to_string(), (width, height));
        self
    }

    fn size_of(&self, path: &Path) -> (u32, u32) {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| self.sizes.get(n).copied())
            .unwrap_or((64, 64))
    }

    fn current_scale(&self) -> (f64, f64) {
        self.graph
            .nodes()
            .iter()
            .find_map(|n| match n.data {
                NodeData::Scale { x, y } => Some((x, y)),
                _ => None,
            })
            .unwrap_or((1.0, 1.0))
    }

    fn bound_source(&self) -> Option<PathBuf> {
        let id = self.graph.find_kind(NodeKind::ImageSource)?;
        match self.graph.node(id)?.data {
            NodeData::ImageSource { image: Some(image) } => {
                self.images.get(image).map(|(p, _)| p.clone())
            }
            _ => None,
        }
    }
}

impl Host for RecordingHost {
    fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    fn load_image(&mut self, path: &Path) -> Result<ImageId> {
        self.loads += 1;
        let size = self.size_of(path);
        self.images.push((path.to_path_buf(), Some(size)));
        Ok(self.images.len() - 1)
    }

    fn set_image_filepath(&mut self, image: ImageId, path: &Path) -> Result<()> {
        let entry = self
            .images
            .get_mut(image)
            .ok_or_else(|| ConverterError::InvalidArgument("unknown image".to_string()))?;
        *entry = (path.to_path_buf(), None);
        Ok(())
    }

    fn reload_image(&mut self, image: ImageId) -> Result<()> {
        self.reloads += 1;
        let path = self
            .images
            .get(image)
            .map(|(p, _)| p.clone())
            .ok_or_else(|| ConverterError::InvalidArgument("unknown image".to_string()))?;
        let size = self.size_of(&path);
        self.images[image].1 = Some(size);
        Ok(())
    }

    fn image_size(&self, image: ImageId) -> Result<(u32, u32)> {
        self.images
            .get(image)
            .and_then(|(_, size)| *size)
            .ok_or_else(|| ConverterError::InvalidArgument("image not loaded".to_string()))
    }

    fn render_settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn render_settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    fn render(&mut self, write_still: bool) -> Result<PathBuf> {
        let output_path = self.settings.output_path.clone();

        if self.fail_at == Some(self.renders.len()) {
            return Err(ConverterError::RenderIo {
                path: output_path.display().to_string(),
                reason: "injected failure".to_string(),
            });
        }

        self.renders.push(RenderRecord {
            source: self.bound_source().unwrap_or_default(),
            output_path: output_path.clone(),
            resolution: self.settings.resolution,
            resolution_percentage: self.settings.resolution_percentage,
            scale: self.current_scale(),
        });

        if write_still {
            fs::write(&output_path, b"").map_err(|e| ConverterError::RenderIo {
                path: output_path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(output_path)
    }
}
