mod aggregate;
mod api;
mod app;
mod cache;
mod config;
mod error;
mod format;
mod login;
mod models;
mod notify;
mod session;
mod storage;
mod sync;
mod views;

fn main() {
    let config = config::AppConfig::from_build_env();
    wasm_logger::init(wasm_logger::Config::new(config.log_level));
    log::info!("expense tracker starting against {}", config.api_base_url);
    yew::Renderer::<app::App>::new().render();
}
