use crate::constants::{EDITOR_TITLE_PREFIX, EDITOR_WINDOW_HEIGHT, EDITOR_WINDOW_WIDTH};
use crate::note::Note;
use crate::state::AppState;
use crate::ui::file_ops::connect_save_button;
use adw::prelude::*;
use adw::{HeaderBar, WindowTitle};
use gtk4::{Box, Button, Orientation, PolicyType, ScrolledWindow, Spinner, TextView, WrapMode};
use std::cell::RefCell;
use std::rc::Rc;

pub fn buffer_to_string(buffer: &gtk4::TextBuffer) -> String {
    let (start, end) = buffer.bounds();
    buffer.text(&start, &end, false).to_string()
}

pub fn editor_title(note: &Note) -> String {
    format!("{} - {}", EDITOR_TITLE_PREFIX, note.display_name())
}

/// Creates the note text view: monospace, word wrapped, with the vertical
/// scrollbar always shown.
pub fn create_text_view() -> (TextView, ScrolledWindow) {
    let text_view = TextView::builder()
        .monospace(true)
        .wrap_mode(WrapMode::WordChar)
        .left_margin(8)
        .right_margin(8)
        .top_margin(8)
        .bottom_margin(8)
        .build();

    let scroll = ScrolledWindow::builder()
        .child(&text_view)
        .hscrollbar_policy(PolicyType::Never)
        .vscrollbar_policy(PolicyType::Always)
        .hexpand(true)
        .vexpand(true)
        .build();

    (text_view, scroll)
}

/// Opens an editor window for `note`. The window closes itself after a
/// successful save.
pub fn open_note_editor(
    parent: &adw::ApplicationWindow,
    state: Rc<RefCell<AppState>>,
    note: Note,
) {
    let title = editor_title(&note);
    let window = adw::Window::builder()
        .transient_for(parent)
        .default_width(EDITOR_WINDOW_WIDTH)
        .default_height(EDITOR_WINDOW_HEIGHT)
        .title(title.as_str())
        .build();

    let content_box = Box::new(Orientation::Vertical, 0);
    window.set_content(Some(&content_box));

    let header_bar = HeaderBar::new();
    header_bar.set_title_widget(Some(&WindowTitle::new(&title, "")));
    content_box.append(&header_bar);

    let (text_view, scroll) = create_text_view();
    content_box.append(&scroll);

    let buffer = text_view.buffer();
    buffer.set_text(&note.content);

    let button_box = Box::new(Orientation::Horizontal, 8);
    button_box.set_halign(gtk4::Align::Center);
    button_box.set_margin_top(8);
    button_box.set_margin_bottom(8);

    let spinner = Spinner::new();
    let save_btn = Button::builder()
        .label("Save Note")
        .tooltip_text("Save and close")
        .build();
    save_btn.add_css_class("suggested-action");
    save_btn.add_css_class("pill");

    button_box.append(&spinner);
    button_box.append(&save_btn);
    content_box.append(&button_box);

    tracing::info!("Opened editor for {}", note.display_name());
    let note = Rc::new(RefCell::new(note));
    connect_save_button(&save_btn, &spinner, &window, &buffer, state, note);

    window.present();
    text_view.grab_focus();
}
