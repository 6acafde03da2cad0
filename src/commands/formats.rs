//! # formats 命令实现
//!
//! 列出支持的输出格式及其扩展名。

use crate::error::Result;
use crate::models::OutputFormat;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FormatRow {
    #[tabled(rename = "Format")]
    name: String,
    #[tabled(rename = "Extension")]
    extension: &'static str,
    #[tabled(rename = "Alpha")]
    alpha: &'static str,
}

/// 执行 formats 命令
pub fn execute() -> Result<()> {
    output::print_header("Supported output formats");

    let rows: Vec<FormatRow> = OutputFormat::ALL
        .iter()
        .map(|f| FormatRow {
            name: f.to_string(),
            extension: f.file_extension(),
            alpha: if f.supports_alpha() { "yes" } else { "no" },
        })
        .collect();

    println!("{}", Table::new(&rows));
    Ok(())
}
