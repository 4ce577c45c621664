//! Logging Module
//!
//! Structured logging utilities built on the `tracing` crate, plus a small
//! epoch progress logger for the training loop.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_target: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// Create a verbose logging config for debugging
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            include_target: true,
            ansi_colors: true,
        }
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Initialize logging with the given configuration
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level.to_tracing_level())
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Training progress logger
pub struct TrainingLogger {
    /// Current epoch
    epoch: usize,
    /// Total epochs
    total_epochs: usize,
    /// Epoch start time
    epoch_start: std::time::Instant,
    /// Training start time
    training_start: std::time::Instant,
}

impl TrainingLogger {
    /// Create a new training logger
    pub fn new(total_epochs: usize) -> Self {
        Self {
            epoch: 0,
            total_epochs,
            epoch_start: std::time::Instant::now(),
            training_start: std::time::Instant::now(),
        }
    }

    /// Log start of an epoch
    pub fn start_epoch(&mut self, epoch: usize) {
        self.epoch = epoch;
        self.epoch_start = std::time::Instant::now();

        tracing::info!("Epoch {}/{} started", epoch + 1, self.total_epochs);
    }

    /// Log end of an epoch with metrics
    pub fn end_epoch(&self, train_loss: f64, train_accuracy: f64) {
        let epoch_time = self.epoch_start.elapsed();
        let total_time = self.training_start.elapsed();

        let epochs_remaining = self.total_epochs - self.epoch - 1;
        let avg_epoch_time = total_time.as_secs_f64() / (self.epoch + 1) as f64;
        let eta_secs = epochs_remaining as f64 * avg_epoch_time;

        tracing::info!(
            "Epoch {}/{} completed in {:.1}s | Loss: {:.4} | Acc: {:.2}% | ETA: {:.0}s",
            self.epoch + 1,
            self.total_epochs,
            epoch_time.as_secs_f64(),
            train_loss,
            train_accuracy * 100.0,
            eta_secs
        );
    }

    /// Log training completion
    pub fn log_complete(&self) {
        let total_time = self.training_start.elapsed();

        tracing::info!(
            "Training complete! {} epochs in {:.1}s",
            self.total_epochs,
            total_time.as_secs_f64()
        );
    }
}
