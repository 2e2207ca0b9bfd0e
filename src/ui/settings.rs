use crate::config::AppConfig;
use crate::save::SaveMode;
use crate::state::AppState;
use adw::prelude::*;
use adw::{ActionRow, PreferencesGroup, PreferencesPage, PreferencesWindow};
use gtk4::{glib, DropDown, Entry, PasswordEntry, StringList};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

pub fn show_settings(parent: &gtk4::Window, state: Rc<RefCell<AppState>>) {
    let window = PreferencesWindow::builder()
        .transient_for(parent)
        .modal(true)
        .title("Settings")
        .default_width(500)
        .build();

    let config = state.borrow().config.clone();

    let page = PreferencesPage::new();
    page.set_title("Saving");
    page.set_icon_name(Some("document-save-symbolic"));
    window.add(&page);

    let save_group = PreferencesGroup::new();
    save_group.set_title("New Notes");
    save_group.set_description(Some("Existing notes are always saved back to their own file"));
    page.add(&save_group);

    let mode_labels = StringList::new(
        SaveMode::ALL
            .iter()
            .map(|m| m.label())
            .collect::<Vec<_>>()
            .as_slice(),
    );
    let mode_row = ActionRow::builder()
        .title("Save Mode")
        .subtitle("How new notes get their file name")
        .build();
    let mode_dropdown = DropDown::builder()
        .model(&mode_labels)
        .valign(gtk4::Align::Center)
        .build();
    let current_mode = SaveMode::ALL
        .iter()
        .position(|m| *m == config.save_mode)
        .unwrap_or(0);
    mode_dropdown.set_selected(current_mode as u32);
    mode_row.add_suffix(&mode_dropdown);
    save_group.add(&mode_row);

    let dir_row = ActionRow::builder()
        .title("Notes Directory")
        .subtitle("Where timestamped and titled notes are written")
        .build();
    let dir_entry = Entry::builder()
        .valign(gtk4::Align::Center)
        .hexpand(true)
        .text(&*config.notes_dir.to_string_lossy())
        .build();
    dir_row.add_suffix(&dir_entry);
    save_group.add(&dir_row);

    let page_ai = PreferencesPage::new();
    page_ai.set_title("Title Generation");
    page_ai.set_icon_name(Some("starred-symbolic"));
    window.add(&page_ai);

    let group = PreferencesGroup::new();
    group.set_title("Provider Settings");
    group.set_description(Some("Configure the service that names your notes"));
    page_ai.add(&group);

    let provider_names: Vec<String> = config.providers.iter().map(|p| p.name.clone()).collect();
    let provider_list = StringList::new(
        provider_names
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .as_slice(),
    );

    let provider_row = ActionRow::builder()
        .title("Active Provider")
        .subtitle("Select which AI service to use")
        .build();
    let provider_dropdown = DropDown::builder()
        .model(&provider_list)
        .valign(gtk4::Align::Center)
        .build();
    let current_index = config
        .providers
        .iter()
        .position(|p| p.name == config.active_provider)
        .unwrap_or(0);
    provider_dropdown.set_selected(current_index as u32);
    provider_row.add_suffix(&provider_dropdown);
    group.add(&provider_row);

    let api_key_row = ActionRow::builder()
        .title("API Key")
        .subtitle("Used when the provider's environment variable is unset")
        .build();
    let api_key_entry = PasswordEntry::builder()
        .valign(gtk4::Align::Center)
        .hexpand(true)
        .build();
    api_key_row.add_suffix(&api_key_entry);
    group.add(&api_key_row);

    let url_row = ActionRow::builder()
        .title("Base URL")
        .subtitle("API endpoint for the provider")
        .build();
    let url_entry = Entry::builder()
        .valign(gtk4::Align::Center)
        .hexpand(true)
        .build();
    url_row.add_suffix(&url_entry);
    group.add(&url_row);

    let model_row = ActionRow::builder()
        .title("Model Name")
        .subtitle("Specific model ID (e.g. gemini-2.0-flash)")
        .build();
    let model_entry = Entry::builder()
        .valign(gtk4::Align::Center)
        .hexpand(true)
        .build();
    model_row.add_suffix(&model_entry);
    group.add(&model_row);

    // Provider edits live here until the window closes.
    let draft = Rc::new(RefCell::new(config));
    let shown_provider = Rc::new(Cell::new(provider_dropdown.selected()));

    let load_fields = {
        let api_key_entry = api_key_entry.downgrade();
        let url_entry = url_entry.downgrade();
        let model_entry = model_entry.downgrade();
        let draft = draft.clone();
        move |index: u32| {
            let (Some(api_key_entry), Some(url_entry), Some(model_entry)) =
                (api_key_entry.upgrade(), url_entry.upgrade(), model_entry.upgrade())
            else {
                return;
            };

            if let Some(p) = draft.borrow().providers.get(index as usize) {
                api_key_entry.set_text(p.api_key.as_deref().unwrap_or(""));
                url_entry.set_text(&p.base_url);
                model_entry.set_text(&p.active_model);
            }
        }
    };

    load_fields(shown_provider.get());

    provider_dropdown.connect_selected_notify(glib::clone!(
        #[strong]
        draft,
        #[strong]
        shown_provider,
        #[weak]
        api_key_entry,
        #[weak]
        url_entry,
        #[weak]
        model_entry,
        move |dropdown| {
            apply_provider_edits(
                &mut draft.borrow_mut(),
                shown_provider.get() as usize,
                &api_key_entry.text(),
                &url_entry.text(),
                &model_entry.text(),
            );
            shown_provider.set(dropdown.selected());
            load_fields(dropdown.selected());
        }
    ));

    window.connect_close_request(glib::clone!(
        #[strong]
        state,
        #[strong]
        draft,
        #[strong]
        mode_dropdown,
        #[strong]
        dir_entry,
        #[strong]
        provider_dropdown,
        #[strong]
        api_key_entry,
        #[strong]
        url_entry,
        #[strong]
        model_entry,
        move |_| {
            let mut config = draft.borrow().clone();

            if let Some(mode) = SaveMode::ALL.get(mode_dropdown.selected() as usize) {
                config.save_mode = *mode;
            }

            let dir = dir_entry.text().trim().to_string();
            if !dir.is_empty() {
                config.notes_dir = PathBuf::from(dir);
            }

            let selected = provider_dropdown.selected() as usize;
            apply_provider_edits(
                &mut config,
                selected,
                &api_key_entry.text(),
                &url_entry.text(),
                &model_entry.text(),
            );
            if let Some(p) = config.providers.get(selected) {
                config.active_provider = p.name.clone();
            }

            let mut s = state.borrow_mut();
            s.config = config;
            if let Err(e) = s.config.save() {
                tracing::error!("Failed to save settings: {}", e);
            }
            s.refresh_generator();

            glib::Propagation::Proceed
        }
    ));

    window.present();
}

/// Copies the provider entry fields into `config.providers[index]`.
/// A blank key is stored as unset.
fn apply_provider_edits(
    config: &mut AppConfig,
    index: usize,
    api_key: &str,
    base_url: &str,
    model: &str,
) {
    let Some(p) = config.providers.get_mut(index) else {
        return;
    };
    let key = api_key.trim();
    p.api_key = if key.is_empty() { None } else { Some(key.to_string()) };
    p.base_url = base_url.to_string();
    p.active_model = model.to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_survive_switching_providers() {
        let mut config = AppConfig::default();
        assert!(config.providers.len() >= 2);
        let first = config.providers[0].clone();

        apply_provider_edits(&mut config, 0, " my-key ", "http://localhost:1234", "custom-model");
        // the second provider is written back unchanged when switching again
        let second = config.providers[1].clone();
        apply_provider_edits(
            &mut config,
            1,
            second.api_key.as_deref().unwrap_or(""),
            &second.base_url,
            &second.active_model,
        );

        let p = &config.providers[0];
        assert_eq!(p.name, first.name);
        assert_eq!(p.api_key.as_deref(), Some("my-key"));
        assert_eq!(p.base_url, "http://localhost:1234");
        assert_eq!(p.active_model, "custom-model");
        assert_eq!(config.providers[1], second);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let mut config = AppConfig::default();
        apply_provider_edits(&mut config, 0, "   ", "u", "m");
        assert_eq!(config.providers[0].api_key, None);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut config = AppConfig::default();
        let before = config.clone();
        apply_provider_edits(&mut config, 99, "k", "u", "m");
        assert_eq!(config, before);
    }
}
