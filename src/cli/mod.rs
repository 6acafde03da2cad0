//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 批量转换图像格式/分辨率
//! - `check`: 校验源目录与输出目录（运行前的轻量检查）
//! - `formats`: 列出支持的输出格式
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, check

pub mod check;
pub mod convert;

use clap::{Parser, Subcommand};

/// imgbatch - 批量图像格式转换
#[derive(Parser)]
#[command(name = "imgbatch")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch convert a folder of images through a render pipeline", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert every image in a folder to the target format and resolution
    Convert(convert::ConvertArgs),

    /// Check that the source and destination folders are usable
    Check(check::CheckArgs),

    /// List supported output formats
    Formats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutputFormat, ScanOrder};

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "imgbatch",
            "convert",
            "--source",
            "in",
            "--destination",
            "out",
            "--prefix",
            "pre_",
            "--format",
            "jpeg",
            "--scale",
            "50",
            "--resolution",
            "1920x1080",
            "--order",
            "listing",
            "--yes",
        ])
        .unwrap();

        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.format, OutputFormat::Jpeg);
        assert_eq!(args.scale, 50);
        assert_eq!(args.resolution, Some((1920, 1080)));
        assert!(args.yes);

        let job = args.job.to_job().unwrap();
        assert_eq!(job.prefix, "pre_");
        assert_eq!(job.order, ScanOrder::Listing);
        assert!(!job.keep_original_resolution);
    }

    #[test]
    fn test_convert_requires_folders_or_job() {
        assert!(Cli::try_parse_from(["imgbatch", "convert"]).is_err());
        assert!(Cli::try_parse_from(["imgbatch", "convert", "--job", "job.json"]).is_ok());
    }

    #[test]
    fn test_job_file_rejects_job_flags() {
        for flag in [
            ["--prefix", "pre_"],
            ["--suffix", "_v2"],
            ["--pattern", "*.tga"],
            ["--order", "listing"],
        ] {
            let result = Cli::try_parse_from([
                "imgbatch", "convert", "--job", "job.json", flag[0], flag[1],
            ]);
            assert!(result.is_err(), "{} should conflict with --job", flag[0]);
        }

        let result = Cli::try_parse_from([
            "imgbatch",
            "check",
            "--job",
            "job.json",
            "--keep-resolution",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_job_file_keeps_render_flags() {
        let cli = Cli::try_parse_from([
            "imgbatch", "convert", "--job", "job.json", "--format", "tga", "--scale", "25",
            "--graph", "graph.json",
        ])
        .unwrap();

        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.format, OutputFormat::Tga);
        assert_eq!(args.scale, 25);
        assert_eq!(args.graph, Some(std::path::PathBuf::from("graph.json")));
    }

    #[test]
    fn test_scale_range_enforced_by_parser() {
        let result = Cli::try_parse_from([
            "imgbatch", "convert", "-s", "in", "-d", "out", "--scale", "0",
        ]);
        assert!(result.is_err());
    }
}
