use adw::prelude::*;

/// Presents a modal message with a single OK button and runs `on_close`
/// once it is dismissed.
pub fn show_alert<F>(parent: &impl IsA<gtk4::Widget>, heading: &str, body: &str, on_close: F)
where
    F: Fn() + 'static,
{
    let dialog = adw::AlertDialog::new(Some(heading), Some(body));
    dialog.add_response("ok", "OK");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.connect_response(None, move |_, _| on_close());
    dialog.present(Some(parent));
}

pub fn show_error(parent: &impl IsA<gtk4::Widget>, heading: &str, body: &str) {
    tracing::error!("{}: {}", heading, body);
    show_alert(parent, heading, body, || {});
}
