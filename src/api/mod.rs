//! API 模块
//!
//! 负责与 OpenProject API v3 的路径和数据结构约定

pub mod openproject;

// 重新导出常用项
pub use openproject::{Collection, API_ROOT, PROBE_ENDPOINTS};
