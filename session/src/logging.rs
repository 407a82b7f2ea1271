/// Initialize logging and announce every Lacquer crate.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// a host that installed its own logger keeps it.
pub fn init_logging() {
    let installed =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
            .is_ok();

    lacquer_core::init();
    lacquer_graphics::init();
    crate::init();

    if !installed {
        log::debug!("A logger was already installed; keeping it");
    }
}
