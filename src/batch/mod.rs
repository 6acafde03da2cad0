//! # 批量转换模块
//!
//! 扫描源目录，并按顺序逐张驱动渲染管线完成转换。
//!
//! ## 功能
//! - 列出源目录中的常规文件（可选 glob 过滤，显式排序策略）
//! - 运行前的目录校验（可重复调用的轻量检查）
//! - 单线程、阻塞式的逐文件渲染，首个失败即中止
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `host/`, `pipeline/`, `policy.rs`, `naming.rs`
//! - 使用 `indicatif` 显示进度

pub mod runner;
pub mod scanner;

pub use runner::{validate, BatchReport, BatchRunner};
pub use scanner::list_files;
