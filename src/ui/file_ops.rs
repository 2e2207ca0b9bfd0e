use crate::api::TitleGenerator;
use crate::constants::NOTE_EXTENSION;
use crate::note::Note;
use crate::save::{NoteSaver, SaveError, SaveMode};
use crate::state::AppState;
use crate::ui::dialogs::{show_alert, show_error};
use crate::ui::editor::buffer_to_string;
use adw::prelude::*;
use gtk4::{Button, FileDialog, FileFilter, Spinner};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

/// Filters offered by the open/save dialogs: text notes first, then everything.
pub fn note_filters() -> (gio::ListStore, FileFilter) {
    let notes = FileFilter::new();
    notes.set_name(Some("Text notes"));
    notes.add_suffix(NOTE_EXTENSION);

    let all = FileFilter::new();
    all.set_name(Some("All files"));
    all.add_pattern("*");

    let filters = gio::ListStore::new::<FileFilter>();
    filters.append(&notes);
    filters.append(&all);
    (filters, notes)
}

/// File dialog starting in the notes directory when it exists.
pub fn note_file_dialog(title: &str, accept_label: &str, notes_dir: &Path) -> FileDialog {
    let (filters, default_filter) = note_filters();
    let dialog = FileDialog::builder()
        .title(title)
        .accept_label(accept_label)
        .modal(true)
        .filters(&filters)
        .default_filter(&default_filter)
        .build();

    if notes_dir.is_dir() {
        dialog.set_initial_folder(Some(&gio::File::for_path(notes_dir)));
    }
    dialog
}

/// Wires the editor's Save button to the active save strategy.
pub fn connect_save_button(
    save_btn: &Button,
    spinner: &Spinner,
    window: &adw::Window,
    buffer: &gtk4::TextBuffer,
    state: Rc<RefCell<AppState>>,
    note: Rc<RefCell<Note>>,
) {
    save_btn.connect_clicked(glib::clone!(
        #[weak]
        window,
        #[weak]
        buffer,
        #[weak]
        spinner,
        #[strong]
        state,
        #[strong]
        note,
        move |save_btn| {
            let mut snapshot = note.borrow().clone();
            snapshot.content = buffer_to_string(&buffer);

            let (mode, notes_dir, generator) = {
                let s = state.borrow();
                (
                    s.config.save_mode,
                    s.config.notes_dir.clone(),
                    s.title_generator.clone(),
                )
            };

            let job = SaveJob {
                window: window.clone(),
                save_btn: save_btn.clone(),
                spinner: spinner.clone(),
                note: note.clone(),
                mode,
                notes_dir,
                generator,
            };

            if NoteSaver::new(mode, &job.notes_dir, None).needs_chosen_path(&snapshot) {
                let dialog = note_file_dialog("Save Note", "Save", &job.notes_dir);
                dialog.set_initial_name(Some(&format!("note.{}", NOTE_EXTENSION)));
                dialog.save(
                    Some(&window),
                    None::<&gio::Cancellable>,
                    move |result| match result {
                        Ok(file) => match file.path() {
                            Some(path) => job.run(snapshot, Some(path)),
                            None => show_error(
                                &job.window,
                                "Save Error",
                                "The chosen location is not a local file.",
                            ),
                        },
                        Err(e) => tracing::debug!("Save dialog dismissed: {}", e),
                    },
                );
            } else {
                job.run(snapshot, None);
            }
        }
    ));
}

/// Everything one save needs once the Save button has been pressed.
struct SaveJob {
    window: adw::Window,
    save_btn: Button,
    spinner: Spinner,
    note: Rc<RefCell<Note>>,
    mode: SaveMode,
    notes_dir: PathBuf,
    generator: Option<Arc<dyn TitleGenerator>>,
}

impl SaveJob {
    fn run(self, mut snapshot: Note, chosen_path: Option<PathBuf>) {
        self.save_btn.set_sensitive(false);
        self.spinner.start();

        let ctx = glib::MainContext::default();
        ctx.spawn_local(async move {
            let saver = NoteSaver::new(self.mode, &self.notes_dir, self.generator.as_deref());
            let result = saver.save(&mut snapshot, chosen_path.as_deref()).await;

            self.spinner.stop();
            self.save_btn.set_sensitive(true);

            match result {
                Ok(report) => {
                    *self.note.borrow_mut() = snapshot;

                    let success = format!(
                        "Note saved successfully to: {}",
                        report.absolute_path().display()
                    );
                    let window = self.window.clone();
                    let announce_and_close = move || {
                        let weak = window.downgrade();
                        show_alert(&window, "Save Success", &success, move || {
                            if let Some(window) = weak.upgrade() {
                                window.close();
                            }
                        });
                    };

                    match report.warning {
                        Some(warning) => {
                            tracing::warn!("{}", warning);
                            show_alert(
                                &self.window,
                                "Title Generation Failed",
                                &warning,
                                announce_and_close,
                            );
                        }
                        None => announce_and_close(),
                    }
                }
                Err(SaveError::EmptyNote) => {
                    show_alert(&self.window, "Save Error", &SaveError::EmptyNote.to_string(), || {});
                }
                Err(e) => {
                    show_error(&self.window, "Save Error", &format!("Error saving note: {}", e));
                }
            }
        });
    }
}
