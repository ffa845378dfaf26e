//! Lambda function configuration client.

use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::types::{
    ApplicationLogLevel as SdkApplicationLogLevel, LogFormat as SdkLogFormat,
    LoggingConfig as SdkLoggingConfig, SystemLogLevel as SdkSystemLogLevel,
};
use lambda_logging_types::{FunctionConfigUpdater, LoggingConfigPayload, LoggingError, Result};
use tracing::{debug, info};

/// Lambda client configuration.
#[derive(Debug, Clone, Default)]
pub struct LambdaConfig {
    /// Region; the default provider chain decides when unset
    pub region: Option<String>,
    /// Named credentials profile
    pub profile: Option<String>,
    /// Custom endpoint (LocalStack and similar)
    pub endpoint_url: Option<String>,
}

/// Lambda client issuing logging configuration updates.
#[derive(Debug, Clone)]
pub struct LambdaClient {
    client: aws_sdk_lambda::Client,
}

impl LambdaClient {
    /// Create a new client from the default credential chain and `config`.
    pub async fn new(config: LambdaConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(ref region) = config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(ref profile) = config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        if sdk_config.region().is_none() {
            return Err(LoggingError::Config(
                "No region configured for the Lambda client".to_string(),
            ));
        }

        info!(region = ?sdk_config.region(), "Lambda client initialized");

        Ok(Self {
            client: aws_sdk_lambda::Client::new(&sdk_config),
        })
    }

    /// Wrap an already configured SDK client.
    pub fn from_client(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionConfigUpdater for LambdaClient {
    async fn update_logging_config(
        &self,
        function_name: &str,
        payload: &LoggingConfigPayload,
    ) -> Result<()> {
        debug!(
            function = function_name,
            group = %payload.log_group,
            "updating function logging config"
        );

        self.client
            .update_function_configuration()
            .function_name(function_name)
            .logging_config(to_sdk_logging_config(payload))
            .send()
            .await
            .map_err(|e| LoggingError::update(function_name, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// Convert a payload into the SDK's logging configuration.
pub fn to_sdk_logging_config(payload: &LoggingConfigPayload) -> SdkLoggingConfig {
    SdkLoggingConfig::builder()
        .log_format(SdkLogFormat::from(payload.log_format.payload_value()))
        .log_group(payload.log_group.clone())
        .set_application_log_level(
            payload
                .application_log_level
                .map(|level| SdkApplicationLogLevel::from(level.as_str())),
        )
        .set_system_log_level(
            payload
                .system_log_level
                .map(|level| SdkSystemLogLevel::from(level.as_str())),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_logging_types::{ApplicationLogLevel, LogFormat, SystemLogLevel};

    #[test]
    fn test_json_payload_conversion() {
        let payload = LoggingConfigPayload {
            log_format: LogFormat::Json,
            log_group: "/aws/lambda/service-dev-hello".to_string(),
            application_log_level: Some(ApplicationLogLevel::Debug),
            system_log_level: Some(SystemLogLevel::Info),
        };

        let sdk = to_sdk_logging_config(&payload);
        assert_eq!(sdk.log_format(), Some(&SdkLogFormat::Json));
        assert_eq!(sdk.log_group(), Some("/aws/lambda/service-dev-hello"));
        assert_eq!(sdk.application_log_level(), Some(&SdkApplicationLogLevel::Debug));
        assert_eq!(sdk.system_log_level(), Some(&SdkSystemLogLevel::Info));
    }

    #[test]
    fn test_text_payload_conversion() {
        let payload = LoggingConfigPayload {
            log_format: LogFormat::Text,
            log_group: "/custom".to_string(),
            application_log_level: None,
            system_log_level: None,
        };

        let sdk = to_sdk_logging_config(&payload);
        assert_eq!(sdk.log_format(), Some(&SdkLogFormat::Text));
        assert!(sdk.application_log_level().is_none());
        assert!(sdk.system_log_level().is_none());
    }

    #[test]
    fn test_client_from_sdk_client() {
        let conf = aws_sdk_lambda::Config::builder()
            .behavior_version(aws_sdk_lambda::config::BehaviorVersion::latest())
            .region(aws_sdk_lambda::config::Region::new("us-east-1"))
            .build();
        let client = LambdaClient::from_client(aws_sdk_lambda::Client::from_conf(conf));
        let _updater: &dyn FunctionConfigUpdater = &client;
    }
}
