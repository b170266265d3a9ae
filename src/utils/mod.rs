/// 工具模块
/// Utility modules
pub mod downscale;
