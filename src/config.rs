use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub counters: CountersConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Start sampling as soon as the daemon launches.
    #[serde(default = "default_autostart")]
    pub autostart: bool,
    #[serde(default)]
    pub counter_reset: CounterResetPolicy,
    /// How often to log monitor stats (ticks, read errors) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            autostart: default_autostart(),
            counter_reset: CounterResetPolicy::default(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_autostart() -> bool {
    true
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

/// What to do when a counter goes backwards between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterResetPolicy {
    /// Negative deltas reach the formatters unmodified.
    #[default]
    PassThrough,
    /// Negative deltas are clamped to zero.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterSourceKind {
    #[default]
    Sysinfo,
    Procfs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountersConfig {
    #[serde(default)]
    pub source: CounterSourceKind,
    #[serde(default = "default_proc_net_dev_path")]
    pub proc_net_dev_path: String,
    #[serde(default = "default_ignore_interfaces")]
    pub ignore_interfaces: Vec<String>,
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            source: CounterSourceKind::default(),
            proc_net_dev_path: default_proc_net_dev_path(),
            ignore_interfaces: default_ignore_interfaces(),
        }
    }
}

fn default_proc_net_dev_path() -> String {
    "/proc/net/dev".into()
}

fn default_ignore_interfaces() -> Vec<String> {
    vec!["lo".into()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Console,
    Log,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresentationConfig {
    #[serde(default)]
    pub sink: SinkKind,
}

impl AppConfig {
    /// Loads `CONFIG_FILE` (default `config.toml`); a missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path, "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!("reading {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitor.stats_log_interval_secs > 0,
            "monitor.stats_log_interval_secs must be > 0, got {}",
            self.monitor.stats_log_interval_secs
        );
        if self.counters.source == CounterSourceKind::Procfs {
            anyhow::ensure!(
                !self.counters.proc_net_dev_path.is_empty(),
                "counters.proc_net_dev_path must be non-empty when counters.source = \"procfs\""
            );
        }
        anyhow::ensure!(
            self.counters
                .ignore_interfaces
                .iter()
                .all(|name| !name.trim().is_empty()),
            "counters.ignore_interfaces must not contain empty names"
        );
        Ok(())
    }
}
