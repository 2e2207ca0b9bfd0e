use crate::constants::{APP_NAME, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_WIDTH};
use crate::note::Note;
use crate::state::AppState;
use crate::ui::dialogs::show_error;
use crate::ui::editor::open_note_editor;
use crate::ui::file_ops::note_file_dialog;
use crate::ui::settings::show_settings;
use adw::prelude::*;
use adw::{Application, ApplicationWindow, HeaderBar, WindowTitle};
use gtk4::{Box, Button, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

fn action_button(label: &str) -> Button {
    let button = Button::with_label(label);
    button.add_css_class("pill");
    button.add_css_class("title-4");
    button
}

/// Builds the launcher window with "Create New Note" and "Edit Existing Note".
pub fn build_main_window(app: &Application, state: Rc<RefCell<AppState>>) -> ApplicationWindow {
    let window = ApplicationWindow::builder()
        .application(app)
        .default_width(MAIN_WINDOW_WIDTH)
        .default_height(MAIN_WINDOW_HEIGHT)
        .title(APP_NAME)
        .build();

    let content_box = Box::new(Orientation::Vertical, 0);
    window.set_content(Some(&content_box));

    let header_bar = HeaderBar::new();
    header_bar.set_title_widget(Some(&WindowTitle::new(APP_NAME, "")));
    let settings_btn = Button::builder()
        .icon_name("emblem-system-symbolic")
        .tooltip_text("Settings")
        .build();
    header_bar.pack_end(&settings_btn);
    content_box.append(&header_bar);

    let button_box = Box::new(Orientation::Horizontal, 20);
    button_box.set_halign(gtk4::Align::Center);
    button_box.set_valign(gtk4::Align::Center);
    button_box.set_vexpand(true);
    button_box.set_margin_start(20);
    button_box.set_margin_end(20);
    button_box.set_margin_top(20);
    button_box.set_margin_bottom(20);

    let new_btn = action_button("Create New Note");
    new_btn.add_css_class("suggested-action");
    let edit_btn = action_button("Edit Existing Note");

    button_box.append(&new_btn);
    button_box.append(&edit_btn);
    content_box.append(&button_box);

    new_btn.connect_clicked(glib::clone!(
        #[weak]
        window,
        #[strong]
        state,
        move |_| {
            open_note_editor(&window, state.clone(), Note::new());
        }
    ));

    edit_btn.connect_clicked(glib::clone!(
        #[weak]
        window,
        #[strong]
        state,
        move |_| {
            let notes_dir = state.borrow().config.notes_dir.clone();
            let dialog = note_file_dialog("Select Note to Edit", "Open", &notes_dir);

            dialog.open(
                Some(&window),
                None::<&gio::Cancellable>,
                glib::clone!(
                    #[weak]
                    window,
                    #[strong]
                    state,
                    move |res| {
                        let file = match res {
                            Ok(file) => file,
                            Err(e) => {
                                tracing::debug!("Open dialog dismissed: {}", e);
                                return;
                            }
                        };

                        let Some(path) = file.path().filter(|p| p.is_file()) else {
                            show_error(
                                &window,
                                "Error",
                                "Selected file does not exist or is not a valid file.",
                            );
                            return;
                        };

                        match Note::open(&path) {
                            Ok(note) => open_note_editor(&window, state.clone(), note),
                            Err(e) => show_error(
                                &window,
                                "Load Error",
                                &format!("Error loading note: {:#}", e),
                            ),
                        }
                    }
                ),
            );
        }
    ));

    settings_btn.connect_clicked(glib::clone!(
        #[weak]
        window,
        #[strong]
        state,
        move |_| {
            show_settings(window.upcast_ref(), state.clone());
        }
    ));

    window
}
