//! # 处理管线构建
//!
//! 在宿主节点图中构建固定的三节点管线：图像源 → 缩放 → 合成输出。
//!
//! 构建会删除节点图中的所有已有节点。节点图非空时必须先经过
//! `ConfirmRebuild` 确认，拒绝则返回 `RebuildDeclined` 且节点图保持不变。
//! 构建期间调用方必须独占节点图。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 使用 `host/graph.rs`

use crate::error::{ConverterError, Result};
use crate::host::{ImageId, NodeData, NodeGraph, NodeId, NodeKind};

/// 破坏性重建节点图前的确认
pub trait ConfirmRebuild {
    /// `existing_nodes` 为将被删除的节点数
    fn confirm(&self, existing_nodes: usize) -> bool;
}

/// 无条件同意（对应命令行 `--yes`）
pub struct AssumeYes;

impl ConfirmRebuild for AssumeYes {
    fn confirm(&self, _existing_nodes: usize) -> bool {
        true
    }
}

impl<F> ConfirmRebuild for F
where
    F: Fn(usize) -> bool,
{
    fn confirm(&self, existing_nodes: usize) -> bool {
        self(existing_nodes)
    }
}

/// 三节点管线中各节点的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    pub source: NodeId,
    pub scale: NodeId,
    pub output: NodeId,
}

/// 清空节点图并构建 源 → 缩放 → 输出
pub fn build_pipeline(graph: &mut NodeGraph, confirm: &dyn ConfirmRebuild) -> Result<Pipeline> {
    if !graph.is_empty() && !confirm.confirm(graph.len()) {
        return Err(ConverterError::RebuildDeclined { nodes: graph.len() });
    }

    graph.clear();

    let source = graph.add_node(NodeKind::ImageSource);
    let scale = graph.add_node(NodeKind::Scale);
    let output = graph.add_node(NodeKind::CompositeOutput);

    graph.connect(scale, output)?;
    graph.connect(source, scale)?;

    Ok(Pipeline {
        source,
        scale,
        output,
    })
}

impl Pipeline {
    /// 将图像绑定到源节点
    pub fn bind_image(&self, graph: &mut NodeGraph, image: ImageId) -> Result<()> {
        match graph.node_mut(self.source).map(|n| &mut n.data) {
            Some(NodeData::ImageSource { image: bound }) => {
                *bound = Some(image);
                Ok(())
            }
            _ => Err(stale_node("image source", self.source)),
        }
    }

    /// 源节点当前绑定的图像
    pub fn bound_image(&self, graph: &NodeGraph) -> Option<ImageId> {
        match graph.node(self.source)?.data {
            NodeData::ImageSource { image } => image,
            _ => None,
        }
    }

    /// 设置缩放节点 X/Y 两轴的比例
    pub fn set_scale(&self, graph: &mut NodeGraph, fraction: f64) -> Result<()> {
        match graph.node_mut(self.scale).map(|n| &mut n.data) {
            Some(NodeData::Scale { x, y }) => {
                *x = fraction;
                *y = fraction;
                Ok(())
            }
            _ => Err(stale_node("scale", self.scale)),
        }
    }

    /// 缩放节点当前的比例
    #[cfg(test)]
    pub fn scale(&self, graph: &NodeGraph) -> Option<(f64, f64)> {
        match graph.node(self.scale)?.data {
            NodeData::Scale { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

fn stale_node(role: &str, id: NodeId) -> ConverterError {
    ConverterError::InvalidArgument(format!(
        "Pipeline {} node #{} is no longer in the graph",
        role, id
    ))
}
