use crate::record::{Level, LogRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

const USER_IDS: &[&str] = &[
    "user-1001", "user-1002", "user-1003", "user-2001", "user-2002", "user-3001",
];

const ENDPOINTS: &[&str] = &[
    "/api/login",
    "/api/logout",
    "/api/orders",
    "/api/orders/checkout",
    "/api/products",
    "/api/profile",
];

const REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "ap-southeast-1"];

const COMPONENTS: &[&str] = &["db-pool", "cache", "auth", "payment-gateway", "queue-consumer"];

const SLOW_RESPONSE_MS: u64 = 1_000;

/// How records are produced on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// The same three records every tick: INFO, ERROR, DEBUG.
    Fixed,
    /// API request and component health records with weighted outcomes.
    #[default]
    Random,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown generation mode '{0}', expected 'random' or 'fixed'")]
pub struct UnknownMode(pub String);

impl FromStr for GenerationMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(GenerationMode::Fixed),
            "random" => Ok(GenerationMode::Random),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Produces synthetic [`LogRecord`]s.
///
/// Generation never fails. The random source is owned by the generator so
/// a seeded instance replays exactly the same sequence of records.
pub struct Generator {
    service: String,
    mode: GenerationMode,
    rng: StdRng,
}

impl Generator {
    pub fn new(service: impl Into<String>, mode: GenerationMode) -> Self {
        Self::with_rng(service, mode, StdRng::from_entropy())
    }

    pub fn seeded(service: impl Into<String>, mode: GenerationMode, seed: u64) -> Self {
        Self::with_rng(service, mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(service: impl Into<String>, mode: GenerationMode, rng: StdRng) -> Self {
        Self {
            service: service.into(),
            mode,
            rng,
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Random source shared with the runner, which draws tick jitter from it.
    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Produce the records for one tick, in emission order. Always at
    /// least one record.
    pub fn tick(&mut self) -> Vec<LogRecord> {
        match self.mode {
            GenerationMode::Fixed => self.fixed_tick(),
            GenerationMode::Random => self.random_tick(),
        }
    }

    fn fixed_tick(&self) -> Vec<LogRecord> {
        vec![
            LogRecord::new(Level::Info, &self.service, "User logged in"),
            LogRecord::new(Level::Error, &self.service, "Database connection failed"),
            LogRecord::new(Level::Debug, &self.service, "Processing request"),
        ]
    }

    fn random_tick(&mut self) -> Vec<LogRecord> {
        let mut records = Vec::with_capacity(3);
        records.push(self.api_request());
        records.push(self.component_health());
        if self.rng.gen_bool(0.3) {
            let endpoint = pick(&mut self.rng, ENDPOINTS);
            records.push(
                LogRecord::new(Level::Debug, &self.service, "Processing request")
                    .endpoint(endpoint),
            );
        }
        records
    }

    fn api_request(&mut self) -> LogRecord {
        let user = pick(&mut self.rng, USER_IDS);
        let endpoint = pick(&mut self.rng, ENDPOINTS);
        let region = pick(&mut self.rng, REGIONS);

        // 5% ERROR, 15% WARN, 80% INFO.
        let roll: u32 = self.rng.gen_range(0..100);
        let (level, status, latency, message) = if roll < 5 {
            let status = *[500u16, 502, 503].choose(&mut self.rng).unwrap_or(&500);
            let latency = self.rng.gen_range(800u64..5_000);
            (Level::Error, status, latency, "Database connection failed")
        } else if roll < 20 {
            if self.rng.gen_bool(0.5) {
                let latency = self.rng.gen_range(SLOW_RESPONSE_MS..3_000);
                (Level::Warn, 200, latency, "Slow response")
            } else {
                let status = *[400u16, 401, 403, 404, 429].choose(&mut self.rng).unwrap_or(&400);
                let latency = self.rng.gen_range(5u64..300);
                (Level::Warn, status, latency, "Request rejected")
            }
        } else {
            let latency = self.rng.gen_range(5..SLOW_RESPONSE_MS);
            (Level::Info, 200, latency, "Request completed")
        };

        LogRecord::new(level, &self.service, message)
            .user_id(user)
            .endpoint(endpoint)
            .region(region)
            .response_time_ms(latency)
            .status_code(status)
    }

    fn component_health(&mut self) -> LogRecord {
        let component = pick(&mut self.rng, COMPONENTS);
        let region = pick(&mut self.rng, REGIONS);
        let (level, message) = if self.rng.gen_bool(0.1) {
            (Level::Warn, "Component degraded")
        } else {
            (Level::Info, "Component healthy")
        };
        LogRecord::new(level, &self.service, message)
            .component(component)
            .region(region)
    }
}

fn pick(rng: &mut StdRng, values: &[&'static str]) -> &'static str {
    values.choose(rng).copied().unwrap_or_default()
}
