use client::app::App;

fn main() {
    console_error_panic_hook::set_once();
    // Best-effort: re-initialization is the only failure mode.
    drop(console_log::init_with_level(log::Level::Info));
    leptos::mount::mount_to_body(App);
}
