/// Intercept messages using the `log` crate and print them to STDERR. Defaults to `info`, but
/// `RUST_LOG` overrides it.
pub fn setup() {
    use env_logger::{Builder, Env};
    // Tests and batch tools may call this more than once; only the first call wins.
    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
}
