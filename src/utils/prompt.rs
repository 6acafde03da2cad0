//! # 交互确认
//!
//! 在终端上询问是否允许重建渲染节点图。
//! 非交互终端（管道、CI）一律视为拒绝。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 使用
//! - 实现 `pipeline::ConfirmRebuild`
//! - 使用 `console` crate

use crate::pipeline::ConfirmRebuild;

use colored::Colorize;
use console::Term;

/// 终端确认
pub struct TerminalPrompt;

impl ConfirmRebuild for TerminalPrompt {
    fn confirm(&self, existing_nodes: usize) -> bool {
        let term = Term::stderr();
        if !term.is_term() {
            return false;
        }

        let question = format!(
            "{} Rebuilding the pipeline deletes {} existing render node(s). Continue? [y/N] ",
            "[?]".yellow().bold(),
            existing_nodes
        );
        if term.write_str(&question).is_err() {
            return false;
        }

        term.read_line()
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
