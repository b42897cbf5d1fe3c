//! 连接探测服务 - 业务能力层
//!
//! 只负责"远端是否可达"，与创建流程无关

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::openproject::PROBE_ENDPOINTS;
use crate::infrastructure::HttpTransport;
use crate::models::outcome::ProbeOutcome;

/// 连接探测
pub struct ConnectivityProbe {
    transport: Arc<dyn HttpTransport>,
}

impl ConnectivityProbe {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 依次 GET 各个入口，返回第一个成功的
    ///
    /// 单个入口的传输错误或非 2xx 只算未命中，继续尝试下一个
    pub async fn probe(&self) -> ProbeOutcome {
        for endpoint in PROBE_ENDPOINTS {
            match self.transport.get(endpoint).await {
                Ok(response) if response.is_success() => {
                    info!("✓ 连接成功: {} ({})", endpoint, response.status);
                    return ProbeOutcome::Reachable {
                        endpoint,
                        status_code: response.status,
                        data: response.json_or_text(),
                    };
                }
                Ok(response) => debug!("{} 返回 {}", endpoint, response.status),
                Err(e) => debug!("{} 请求失败: {}", endpoint, e),
            }
        }

        warn!("⚠️ 所有入口均不可用");
        ProbeOutcome::Unreachable {
            message: "没有可用的 API 入口".to_string(),
        }
    }
}
