//! # 处理节点图
//!
//! 渲染器的合成节点图：节点 + 有向连接。
//! 每个节点只有一个输入端口和一个输出端口；输入端口最多接一条连接，
//! 新连接会替换旧连接。
//!
//! 节点图可以保存为 JSON 文件，在多次运行之间保留（对应渲染器工程中的节点树）。
//! 图像句柄只在一次运行内有效，不写入文件。
//!
//! ## 依赖关系
//! - 被 `host/`, `pipeline/`, `commands/convert.rs` 使用
//! - 使用 `serde_json` 读写节点图文件

use crate::error::{ConverterError, Result};
use crate::host::ImageId;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 节点标识，在同一张图内单调递增，清空后不复用
pub type NodeId = u32;

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// 图像源
    ImageSource,
    /// 缩放
    Scale,
    /// 合成输出
    CompositeOutput,
}

impl NodeKind {
    /// 节点默认名称
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::ImageSource => "Image",
            NodeKind::Scale => "Scale",
            NodeKind::CompositeOutput => "Composite",
        }
    }
}

/// 节点参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeData {
    ImageSource {
        #[serde(skip)]
        image: Option<ImageId>,
    },
    Scale { x: f64, y: f64 },
    CompositeOutput,
}

impl NodeData {
    fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::ImageSource => NodeData::ImageSource { image: None },
            NodeKind::Scale => NodeData::Scale { x: 1.0, y: 1.0 },
            NodeKind::CompositeOutput => NodeData::CompositeOutput,
        }
    }
}

/// 图中的一个节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// 唯一名称，如 `Image`, `Image.001`
    pub name: String,
    pub data: NodeData,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::ImageSource { .. } => NodeKind::ImageSource,
            NodeData::Scale { .. } => NodeKind::Scale,
            NodeData::CompositeOutput => NodeKind::CompositeOutput,
        }
    }
}

/// 有向连接：`from` 的输出 → `to` 的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
}

/// 节点图
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    next_id: NodeId,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 节点图文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConverterError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConverterError::GraphFile {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 加载节点图文件；文件不存在时返回空图
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 保存为 JSON 节点图文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| ConverterError::GraphFile {
            path: path.display().to_string(),
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConverterError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 删除所有节点（连接随之删除）
    pub fn clear(&mut self) {
        let ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        for id in ids {
            self.remove_node(id);
        }
    }

    /// 新建节点，返回其标识
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;

        let name = self.unique_name(kind.label());
        self.nodes.push(Node {
            id,
            name,
            data: NodeData::for_kind(kind),
        });
        id
    }

    /// 删除单个节点及其连接
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        self.links.retain(|l| l.from != id && l.to != id);
        Some(self.nodes.remove(idx))
    }

    /// 连接 `from` 的输出到 `to` 的输入，替换 `to` 上已有的输入连接
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        for id in [from, to] {
            if self.node(id).is_none() {
                return Err(ConverterError::InvalidArgument(format!(
                    "Cannot link missing node #{}",
                    id
                )));
            }
        }
        if from == to {
            return Err(ConverterError::InvalidArgument(format!(
                "Cannot link node #{} to itself",
                from
            )));
        }

        self.links.retain(|l| l.to != to);
        self.links.push(Link { from, to });
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 接在 `id` 输入端口上的上游节点
    pub fn upstream(&self, id: NodeId) -> Option<NodeId> {
        self.links.iter().find(|l| l.to == id).map(|l| l.from)
    }

    /// 第一个指定类型的节点
    pub fn find_kind(&self, kind: NodeKind) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.kind() == kind).map(|n| n.id)
    }

    /// 以节点类型表示的连接列表（与节点标识无关，便于比较拓扑）
    #[cfg(test)]
    pub fn link_kinds(&self) -> Vec<(NodeKind, NodeKind)> {
        self.links
            .iter()
            .filter_map(|l| Some((self.node(l.from)?.kind(), self.node(l.to)?.kind())))
            .collect()
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| self.nodes.iter().any(|n| n.name == name);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{}.{:03}", base, i))
            .find(|name| !taken(name.as_str()))
            .unwrap_or_else(|| base.to_string())
    }
}
