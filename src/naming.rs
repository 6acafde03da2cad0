//! # 输出文件命名
//!
//! 根据前缀、后缀与渲染输出格式的扩展名计算目标文件名。
//!
//! 不做冲突检测：两个源文件的主干名相同（仅扩展名不同）时，
//! 后处理的文件会覆盖先处理的输出。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 无外部模块依赖

/// 去掉文件名的最后一个扩展名
///
/// 开头的点不算扩展名分隔符，因此 `.hidden` 保持不变。
pub fn file_stem(filename: &str) -> &str {
    let leading = filename.len() - filename.trim_start_matches('.').len();
    match filename[leading..].rfind('.') {
        Some(idx) => &filename[..leading + idx],
        None => filename,
    }
}

/// 计算目标文件名：`prefix + stem + suffix + extension`
pub fn destination_name(filename: &str, prefix: &str, suffix: &str, extension: &str) -> String {
    format!("{}{}{}{}", prefix, file_stem(filename), suffix, extension)
}
