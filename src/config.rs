//! 斑块追踪配置 - 通过JSON文件调整参数, 运行中可热更新

use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ConfigError;
use crate::pipeline::{ProcessOptions, DEFAULT_MIN_BLOB_AREA, DEFAULT_THRESHOLD};

/// 默认逻辑分辨率 (高度, 宽度按源比例推算)
pub const DEFAULT_LOGICAL_RESOLUTION: u32 = 120;

/// 斑块追踪参数配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    // === 检测参数 ===
    pub threshold: u8,        // 帧差阈值 (0-255)
    pub min_blob_area: usize, // 最小斑块面积(像素)

    // === 调度参数 ===
    pub logical_resolution: u32, // 处理分辨率高度
    pub prefer_gpu: bool,        // 优先尝试GPU后端
    pub refresh_hz: f64,         // 显示刷新率
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_blob_area: DEFAULT_MIN_BLOB_AREA,
            logical_resolution: DEFAULT_LOGICAL_RESOLUTION,
            prefer_gpu: true,
            refresh_hz: 60.0,
        }
    }
}

impl BlobConfig {
    /// 从JSON文件加载配置, 文件不存在时写入默认值, 解析失败回退默认值
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("✅ 配置已从 {} 加载", path);
                    config
                }
                Err(e) => {
                    log::warn!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    log::error!("❌ 保存配置失败: {}", e);
                }
                config
            }
        }
    }

    /// 严格加载: 错误直接返回
    pub fn try_load(path: &str) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("💾 配置已保存到 {}", path);
        Ok(())
    }

    /// 单帧处理参数
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            threshold: self.threshold,
            min_blob_area: self.min_blob_area,
        }
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        log::info!("🎛️  当前斑块追踪配置:");
        log::info!("  帧差阈值: {}", self.threshold);
        log::info!("  最小斑块面积: {}", self.min_blob_area);
        log::info!("  逻辑分辨率: {}p", self.logical_resolution);
        log::info!("  优先GPU: {}", self.prefer_gpu);
        log::info!("  刷新率: {:.1} Hz", self.refresh_hz);
    }
}

/// 共享的实时配置
///
/// 调度循环在每个tick开始时读取一次快照; 外部在tick之间写入.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig {
    inner: Arc<Mutex<BlobConfig>>,
}

impl SharedConfig {
    pub fn new(config: BlobConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(config)),
        }
    }

    /// 当前配置快照
    pub fn snapshot(&self) -> BlobConfig {
        self.lock().clone()
    }

    /// 修改配置
    pub fn update(&self, f: impl FnOnce(&mut BlobConfig)) {
        f(&mut *self.lock());
    }

    fn lock(&self) -> MutexGuard<'_, BlobConfig> {
        // 单线程读写, 毒化时仍沿用内部值
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
