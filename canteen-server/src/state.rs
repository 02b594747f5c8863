//! Application state

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::email::EmailService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Email delivery service (SES)
    pub email: EmailService,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Rate limiter for login/registration/OTP routes
    pub rate_limiter: RateLimiter,
    /// Business timezone
    pub timezone: chrono_tz::Tz,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        Ok(Self {
            pool,
            email: EmailService::new(ses, config.ses_from_email.clone()),
            jwt_secret: config.jwt_secret.clone(),
            rate_limiter: RateLimiter::new(),
            timezone: config.timezone,
        })
    }
}
