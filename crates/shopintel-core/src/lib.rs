pub mod app_config;
pub mod config;
pub mod insights;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use insights::{
    Category, ContactInfo, Faq, ImportantLink, InsightsRecord, LinkCategory, PolicyDocument,
    PolicyKind, Product, SocialHandle, SocialPlatform,
};
