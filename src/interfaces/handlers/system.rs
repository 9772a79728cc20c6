use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        RwLock,
    },
    time::Duration,
};

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use once_cell::sync::Lazy;
use serde::Serialize;
use sysinfo::System;

use crate::{constants::START_TIME, use_cases::trends::TrendCacheStats, AppState};

/// Seconds a health snapshot is served before it is rebuilt.
const HEALTH_MEMO_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
struct TrendCacheInfo {
    cached_keys: usize,
    refreshes_in_flight: usize,
}

impl From<TrendCacheStats> for TrendCacheInfo {
    fn from(stats: TrendCacheStats) -> Self {
        TrendCacheInfo {
            cached_keys: stats.cached_keys,
            refreshes_in_flight: stats.refreshes_in_flight,
        }
    }
}

#[derive(Serialize, Clone, Default)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: String,
    database: String,
    trend_cache: TrendCacheInfo,
    memory_usage: String,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> =
    Lazy::new(|| RwLock::new(HealthCheckResponse::default()));

async fn build_health_response(state: &web::Data<AppState>) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let mut sys = System::new_all();
    sys.refresh_all();

    let system = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let database = match state.wardrobe_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "Unavailable"
        }
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or_else(
            || "Unknown".to_string(),
            |p| format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0),
        );

    let status = if database == "OK" { "healthy" } else { "degraded" };

    HealthCheckResponse {
        status: status.to_string(),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        trend_cache: state.trend_cache.stats().into(),
        memory_usage,
        system,
    }
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last < HEALTH_MEMO_SECS {
        match CACHED_STATUS.read() {
            Ok(cached) => return HttpResponse::Ok().json(cached.clone()),
            Err(e) => tracing::warn!("Health check cache lock poisoned: {}", e),
        }
    }

    let response = build_health_response(&state).await;
    if let Ok(mut cache) = CACHED_STATUS.write() {
        *cache = response.clone();
        LAST_CHECK.store(now, Ordering::Relaxed);
    }

    HttpResponse::Ok().json(response)
}
