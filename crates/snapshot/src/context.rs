use {rollcall_config::ResolvedConfig, rollcall_i18n::Catalog};

/// Application context built once at startup and passed by reference
/// into every handler. Holds everything that outlives a single
/// invocation; per-invocation state never lands here.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ResolvedConfig,
    pub catalog: Catalog,
}
