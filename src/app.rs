//! Main application UI and state management.
//! Handles the study, review, word list and folder screens and persists every
//! change through the database module.

use crate::database::db;
use crate::dictionary::worker::{LookupOutcome, LookupTarget};
use crate::dictionary::{DictionaryEntry, DictionaryError, LookupWorker};
use crate::export::json::{export_learned_words, import_learned_words};
use crate::models::study_session::study_candidates;
use crate::models::word_list::{LevelClass, WordSort, custom_view, learned_view};
use crate::models::word_set::builtin_sets;
use crate::models::{
    Folder, FolderSession, ReviewFilter, ReviewScheduler, ReviewSession, ReviewableWord,
    StudySession, Word, WordSet,
};
use chrono::{DateTime, Local, Utc};
use eframe::egui;
use rusqlite::Connection;
use std::time::Duration;

/// Application tabs
#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Tab {
    #[default]
    Study,
    Review,
    MyWords,
    Folders,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum ListFilter {
    #[default]
    Learned,
    Custom,
}

/// Removal waiting for confirmation
enum PendingRemoval {
    Learned {
        id: i64,
        word: String,
        review_queue_len: Option<usize>,
    },
    Custom {
        id: i64,
        word: String,
    },
    Folder {
        id: i64,
        name: String,
    },
}

#[derive(Default)]
struct AddWordDialog {
    open: bool,
    input: String,
    custom_meaning: String,
    preview: Option<DictionaryEntry>,
    error: Option<String>,
    loading: bool,
    /// Word of the lookup in flight, if any
    requested: Option<String>,
    folder_id: Option<i64>,
}

impl AddWordDialog {
    /// Shows an entry that did not need a lookup
    fn show_cached(&mut self, entry: DictionaryEntry) {
        self.requested = None;
        self.loading = false;
        self.error = None;
        self.preview = Some(entry);
    }

    fn begin_lookup(&mut self, word: String) {
        self.error = None;
        self.preview = None;
        self.loading = true;
        self.requested = Some(word);
    }

    /// Takes a finished lookup. Outcomes of superseded requests are dropped,
    /// and a preview is only shown if the input still holds the same word.
    fn receive(&mut self, word: &str, result: Result<DictionaryEntry, DictionaryError>) {
        if self.requested.as_deref() != Some(word) {
            return;
        }
        self.requested = None;
        self.loading = false;
        if word != self.input.trim() {
            return;
        }
        match result {
            Ok(entry) => {
                self.preview = Some(entry);
                self.error = None;
            }
            Err(e) => {
                self.preview = None;
                self.error = Some(e.to_string());
            }
        }
    }
}

const IMPORT_SHAPE: &str = r#"[{ "id": 1, "word": "...", "learnedAt": "..." }]"#;

/// Formats a timestamp as a local YYYY-MM-DD string
fn format_date(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d").to_string()
}

fn filter_label(filter: ReviewFilter) -> &'static str {
    match filter {
        ReviewFilter::Due => "Due",
        ReviewFilter::Today => "Learned today",
        ReviewFilter::All => "All",
    }
}

/// Headword, pronunciation and audio link shared by every card view
fn word_header(ui: &mut egui::Ui, word: &str, pronunciation: &str, audio_url: &str) {
    ui.heading(word);
    ui.horizontal(|ui| {
        if !pronunciation.is_empty() {
            ui.label(pronunciation);
        }
        if !audio_url.is_empty() {
            ui.hyperlink_to("🔊 Listen", audio_url);
        }
    });
}

fn examples_block(ui: &mut egui::Ui, examples: &[String]) {
    if examples.is_empty() {
        ui.label("No examples.");
    }
    for (i, example) in examples.iter().enumerate() {
        ui.label(format!("{}. \"{}\"", i + 1, example));
    }
}

pub struct VocabApp {
    conn: Connection,
    scheduler: ReviewScheduler,
    lookups: LookupWorker,

    word_sets: Vec<WordSet>,
    selected_set: u32,
    set_words: Vec<Word>,
    custom_words: Vec<Word>,
    learned_words: Vec<ReviewableWord>,
    known_ids: Vec<i64>,
    folders: Vec<Folder>,

    current_tab: Tab,
    study: StudySession,
    review: ReviewSession,

    list_filter: ListFilter,
    list_query: String,
    list_sort: WordSort,

    selected_folder: Option<i64>,
    folder_words: Vec<Word>,
    folder_session: Option<FolderSession>,
    new_folder_name: String,

    add_dialog: AddWordDialog,
    pending_removal: Option<PendingRemoval>,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_result_dialog: bool,
    result_message: String,
}

impl eframe::App for VocabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for outcome in self.lookups.poll() {
            self.apply_lookup(outcome);
        }
        if self.lookups.pending() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.render_top_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("main_scroll")
                .show(ui, |ui| match self.current_tab {
                    Tab::Study => self.render_study(ui),
                    Tab::Review => self.render_review(ui),
                    Tab::MyWords => self.render_word_list(ui),
                    Tab::Folders => self.render_folders(ui),
                });
        });

        self.render_add_dialog(ctx);
        self.render_removal_dialog(ctx);

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl VocabApp {
    /// Creates the application with everything loaded from the database
    pub fn new(
        conn: Connection,
        scheduler: ReviewScheduler,
        lookups: LookupWorker,
    ) -> rusqlite::Result<Self> {
        let word_sets = builtin_sets();
        let selected_set = db::get_selected_set(&conn)?
            .filter(|n| word_sets.iter().any(|s| s.number == *n))
            .or_else(|| word_sets.first().map(|s| s.number))
            .unwrap_or(1);

        let mut app = Self {
            custom_words: db::get_custom_words(&conn)?,
            learned_words: db::get_learned_words(&conn)?,
            known_ids: db::get_known_ids(&conn)?,
            folders: db::get_folders(&conn)?,
            conn,
            scheduler,
            lookups,
            word_sets,
            selected_set,
            set_words: Vec::new(),
            current_tab: Tab::Study,
            study: StudySession::default(),
            review: ReviewSession::default(),
            list_filter: ListFilter::Learned,
            list_query: String::new(),
            list_sort: WordSort::Recent,
            selected_folder: None,
            folder_words: Vec::new(),
            folder_session: None,
            new_folder_name: String::new(),
            add_dialog: AddWordDialog::default(),
            pending_removal: None,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_result_dialog: false,
            result_message: String::new(),
        };

        tracing::info!(
            learned = app.learned_words.len(),
            custom = app.custom_words.len(),
            folders = app.folders.len(),
            "loaded word collections"
        );

        app.load_set_words();
        Ok(app)
    }

    fn all_words(&self) -> Vec<Word> {
        self.set_words
            .iter()
            .chain(self.custom_words.iter())
            .cloned()
            .collect()
    }

    fn show_result(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    /// Logs a failed store call and tells the learner about it
    fn report_db_error(&mut self, action: &str, e: rusqlite::Error) {
        tracing::error!("{action} failed: {e}");
        self.show_result(format!("Could not {action}: {e}"));
    }

    /// Builds the study words of the selected set, filling them from the
    /// cache and queueing lookups for the rest
    fn load_set_words(&mut self) {
        let Some(set) = self.word_sets.iter().find(|s| s.number == self.selected_set) else {
            return;
        };

        let mut words = set.words();
        let mut missing = 0;
        for word in &mut words {
            match db::get_cached_entry(&word.word, &self.conn) {
                Ok(Some(entry)) => {
                    word.apply_entry(&entry);
                    self.fill_learned(word.id, &entry);
                }
                Ok(None) => {
                    self.lookups.request(LookupTarget::Word(word.id), word.word.clone());
                    missing += 1;
                }
                Err(e) => tracing::warn!(word = %word.word, "cache read failed: {e}"),
            }
        }
        tracing::info!(set = self.selected_set, total = words.len(), missing, "word set loaded");

        self.set_words = words;
        let all = self.all_words();
        self.study = StudySession::start(&all, &self.known_ids, &mut rand::thread_rng());
    }

    /// Restarts study when its current word no longer exists or study had run dry
    fn refresh_study(&mut self) {
        let all = self.all_words();
        if self.study.current(&all).is_none() {
            self.study = StudySession::start(&all, &self.known_ids, &mut rand::thread_rng());
        }
    }

    fn select_set(&mut self, number: u32) {
        self.selected_set = number;
        if let Err(e) = db::set_selected_set(number, &self.conn) {
            tracing::warn!("could not remember selected set: {e}");
        }
        self.load_set_words();
    }

    /// Applies a finished dictionary lookup to whatever asked for it
    fn apply_lookup(&mut self, outcome: LookupOutcome) {
        match outcome.target {
            LookupTarget::NewWord => self.add_dialog.receive(&outcome.word, outcome.result),
            LookupTarget::Word(id) => {
                let Ok(entry) = outcome.result else {
                    return;
                };
                if let Err(e) = db::cache_entry(&outcome.word, &entry, &self.conn) {
                    tracing::warn!(word = %outcome.word, "cache write failed: {e}");
                }
                if let Some(word) = self.set_words.iter_mut().find(|w| w.id == id) {
                    word.apply_entry(&entry);
                }
                self.fill_learned(id, &entry);
                if let Some(word) = self.custom_words.iter_mut().find(|w| w.id == id) {
                    word.apply_entry(&entry);
                    if let Err(e) = db::update_custom_word(word, &self.conn) {
                        tracing::warn!(id, "custom word update failed: {e}");
                    }
                }
            }
        }
    }

    /// Completes a learned word that was saved before its lookup finished
    fn fill_learned(&mut self, id: i64, entry: &DictionaryEntry) {
        let Some(learned) = self.learned_words.iter_mut().find(|w| w.id == id) else {
            return;
        };
        if !learned.fill_missing(entry) {
            return;
        }
        match db::update_learned_content(learned, &self.conn) {
            Ok(()) => tracing::debug!(id, "learned word completed from lookup"),
            Err(e) => tracing::warn!(id, "learned word update failed: {e}"),
        }
    }

    /// Renders tab navigation and the import/export buttons
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let due = self.scheduler.due_count(&self.learned_words, Utc::now());
        let learned = self.learned_words.len();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Vocabulary");
                ui.separator();
                ui.selectable_value(&mut self.current_tab, Tab::Study, "📚 Study");
                ui.selectable_value(
                    &mut self.current_tab,
                    Tab::Review,
                    format!("🔄 Review ({due})"),
                );
                ui.selectable_value(
                    &mut self.current_tab,
                    Tab::MyWords,
                    format!("📋 My words ({learned})"),
                );
                ui.selectable_value(&mut self.current_tab, Tab::Folders, "📁 Folders");
            });
            ui.horizontal(|ui| {
                if ui.button("+ Add word").clicked() {
                    self.add_dialog = AddWordDialog {
                        open: true,
                        ..AddWordDialog::default()
                    };
                }
                if ui.button("Export learned words").clicked() {
                    self.handle_export();
                }
                if ui.button("Import learned words").clicked() {
                    self.handle_import();
                }
                if self.lookups.pending() > 0 {
                    ui.spinner();
                    ui.label(format!("Looking up {} words…", self.lookups.pending()));
                }
            });
        });
    }

    /// Renders study mode: one random word at a time
    fn render_study(&mut self, ui: &mut egui::Ui) {
        let mut chosen_set = self.selected_set;
        let set_name = self
            .word_sets
            .iter()
            .find(|s| s.number == self.selected_set)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        egui::ComboBox::from_label("Word set")
            .selected_text(set_name)
            .show_ui(ui, |ui| {
                for set in &self.word_sets {
                    let label = format!("{}. {}", set.number, set.name);
                    ui.selectable_value(&mut chosen_set, set.number, label);
                }
            });
        if chosen_set != self.selected_set {
            self.select_set(chosen_set);
        }

        let words = self.all_words();
        let remaining = study_candidates(&words, &self.known_ids).len();
        ui.label(format!(
            "Remaining: {} | Learned: {} | Known: {}",
            remaining,
            self.learned_words.len(),
            self.known_ids.len()
        ));
        ui.separator();

        let Some(word) = self.study.current(&words).cloned() else {
            ui.heading("All done!");
            ui.label("You have gone through every word.");
            return;
        };
        let already_learned = self.study.is_learned(&self.learned_words);

        let mut action_prev = false;
        let mut action_next = false;
        let mut action_learned = false;
        let mut action_known = false;

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                word_header(ui, &word.word, &word.pronunciation, &word.audio_url);
                if word.is_custom {
                    ui.label("(added by you)");
                }
                if already_learned {
                    ui.label("Already learned");
                }
                ui.add_space(10.0);

                let meaning_label = if self.study.show_meaning {
                    "Hide meaning"
                } else {
                    "Show meaning"
                };
                if ui.button(meaning_label).clicked() {
                    self.study.toggle_meaning();
                }
                if self.study.show_meaning {
                    ui.label(&word.meaning);
                }

                let example_label = if self.study.show_example {
                    "Hide examples"
                } else {
                    "Show examples"
                };
                if ui.button(example_label).clicked() {
                    self.study.toggle_example();
                }
                if self.study.show_example {
                    examples_block(ui, &word.examples);
                }

                ui.horizontal(|ui| {
                    ui.hyperlink_to(
                        "Oxford dictionary",
                        format!(
                            "https://www.oxfordlearnersdictionaries.com/definition/english/{}",
                            word.word
                        ),
                    );
                });
                ui.add_space(10.0);
            });
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.study.can_go_back(), egui::Button::new("← Previous"))
                .clicked()
            {
                action_prev = true;
            }
            let learned_label = if already_learned { "Already learned" } else { "Learned it" };
            if ui
                .add_enabled(!already_learned, egui::Button::new(learned_label))
                .clicked()
            {
                action_learned = true;
            }
            if ui.button("Next →").clicked() {
                action_next = true;
            }
        });
        if ui.button("I already know this (don't show again)").clicked() {
            action_known = true;
        }

        // Execute deferred actions
        let mut rng = rand::thread_rng();
        if action_prev {
            self.study.previous_word();
        }
        if action_next {
            self.study.next_word(&words, &self.known_ids, &mut rng);
        }
        if action_learned {
            let record = self.study.mark_learned(
                &words,
                &self.known_ids,
                &self.learned_words,
                Utc::now(),
                &mut rng,
            );
            if let Some(record) = record {
                match db::add_learned_word(&record, &self.conn) {
                    Ok(true) => self.learned_words.push(record),
                    Ok(false) => {}
                    Err(e) => self.report_db_error("save the learned word", e),
                }
            }
        }
        if action_known {
            if let Some(id) = self.study.mark_known(&words, &self.known_ids, &mut rng) {
                match db::mark_known(id, &self.conn) {
                    Ok(()) => self.known_ids.push(id),
                    Err(e) => self.report_db_error("mark the word as known", e),
                }
            }
        }
    }

    /// Renders review mode over the learned words
    fn render_review(&mut self, ui: &mut egui::Ui) {
        if self.learned_words.is_empty() {
            ui.heading("No learned words yet");
            ui.label("Mark words as learned in study mode first.");
            return;
        }

        let now_local = Local::now();
        let now = now_local.with_timezone(&Utc);
        let due = self.scheduler.due_count(&self.learned_words, now);

        let mut chosen_filter = self.review.filter;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut chosen_filter, ReviewFilter::Due, format!("Due ({due})"));
            ui.selectable_value(
                &mut chosen_filter,
                ReviewFilter::Today,
                filter_label(ReviewFilter::Today),
            );
            ui.selectable_value(
                &mut chosen_filter,
                ReviewFilter::All,
                format!("All ({})", self.learned_words.len()),
            );
        });
        if chosen_filter != self.review.filter {
            self.review.set_filter(chosen_filter);
        }
        ui.separator();

        let queue: Vec<ReviewableWord> = self
            .review
            .queue(&self.scheduler, &self.learned_words, &now_local)
            .into_iter()
            .cloned()
            .collect();
        let refs: Vec<&ReviewableWord> = queue.iter().collect();

        let Some(word) = self.review.current(&refs).cloned() else {
            ui.heading(format!("Nothing in \"{}\"", filter_label(self.review.filter)));
            ui.label("Well done! Switch to \"All\" to see every learned word.");
            return;
        };

        let (position, total) = self.review.progress(refs.len());
        ui.add(
            egui::ProgressBar::new(position as f32 / total as f32)
                .text(format!("{position} / {total}")),
        );

        let mut action_remembered = false;
        let mut action_forgotten = false;
        let mut action_prev = false;
        let mut action_next = false;
        let mut action_remove = false;

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.horizontal(|ui| {
                    ui.label(self.scheduler.describe_status(&word).to_string());
                    ui.label(format!("Reviewed {} times", word.review_count));
                });
                word_header(ui, &word.word, &word.pronunciation, &word.audio_url);
                ui.horizontal(|ui| {
                    ui.label(format!("Learned: {}", format_date(word.learned_at)));
                    if let Some(next) = word.next_review_date {
                        ui.label(format!("Next review: {}", format_date(next)));
                    }
                });
                ui.add_space(10.0);

                let meaning_label = if self.review.show_meaning {
                    "Hide meaning"
                } else {
                    "Show meaning"
                };
                if ui.button(meaning_label).clicked() {
                    self.review.toggle_meaning();
                }
                if self.review.show_meaning {
                    ui.label(&word.meaning);
                }

                let example_label = if self.review.show_example {
                    "Hide examples"
                } else {
                    "Show examples"
                };
                if ui.button(example_label).clicked() {
                    self.review.toggle_example();
                }
                if self.review.show_example {
                    examples_block(ui, &word.examples);
                }
                ui.add_space(10.0);
            });
        });

        ui.horizontal(|ui| {
            if ui.button("Forgot it").clicked() {
                action_forgotten = true;
            }
            if ui.button("Remembered").clicked() {
                action_remembered = true;
            }
        });
        ui.horizontal(|ui| {
            if ui.button("← Previous").clicked() {
                action_prev = true;
            }
            if ui.button("Remove from list").clicked() {
                action_remove = true;
            }
            if ui.button("Next →").clicked() {
                action_next = true;
            }
        });

        ui.separator();
        ui.label(format!(
            "\"Remembered\" stretches the interval: {}",
            self.scheduler.intervals()
        ));
        ui.label(format!(
            "\"Forgot it\" brings the word back after {} day(s).",
            self.scheduler.intervals().days(0)
        ));

        // Execute deferred actions
        let updated = if action_remembered {
            self.review.remembered(&self.scheduler, &refs, now_local)
        } else if action_forgotten {
            self.review.forgotten(&self.scheduler, &refs, now_local)
        } else {
            None
        };
        if let Some(updated) = updated {
            self.persist_review(updated);
        }
        if action_prev {
            self.review.previous(refs.len());
        }
        if action_next {
            self.review.next(refs.len());
        }
        if action_remove {
            self.pending_removal = Some(PendingRemoval::Learned {
                id: word.id,
                word: word.word.clone(),
                review_queue_len: Some(refs.len()),
            });
        }
    }

    /// Writes a scheduler result to the store and swaps it into memory
    fn persist_review(&mut self, updated: ReviewableWord) {
        if let Err(e) = db::update_learned_word(&updated, &self.conn) {
            self.report_db_error("save the review", e);
            return;
        }
        tracing::debug!(
            id = updated.id,
            level = updated.review_level,
            count = updated.review_count,
            "review recorded"
        );
        if let Some(slot) = self.learned_words.iter_mut().find(|w| w.id == updated.id) {
            *slot = updated;
        }
    }

    /// Renders the learned/custom word lists with search and sorting
    fn render_word_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(
                &mut self.list_filter,
                ListFilter::Learned,
                format!("Learned ({})", self.learned_words.len()),
            );
            ui.selectable_value(
                &mut self.list_filter,
                ListFilter::Custom,
                format!("Added by me ({})", self.custom_words.len()),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.list_query);
            egui::ComboBox::from_label("Sort")
                .selected_text(match self.list_sort {
                    WordSort::Recent => "Recent",
                    WordSort::Alphabetical => "A-Z",
                    WordSort::ReviewLevel => "Review level",
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.list_sort, WordSort::Recent, "Recent");
                    ui.selectable_value(&mut self.list_sort, WordSort::Alphabetical, "A-Z");
                    ui.selectable_value(&mut self.list_sort, WordSort::ReviewLevel, "Review level");
                });
        });
        ui.separator();

        let mut remove: Option<PendingRemoval> = None;

        match self.list_filter {
            ListFilter::Learned => {
                let view = learned_view(&self.learned_words, &self.list_query, self.list_sort);
                if view.is_empty() {
                    ui.label("No learned words match.");
                }
                for word in view {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(&word.word);
                            let class = LevelClass::for_level(word.review_level);
                            ui.label(format!("[{}]", class.label()));
                            ui.label(self.scheduler.describe_status(word).to_string());
                            if ui.small_button("Delete").clicked() {
                                remove = Some(PendingRemoval::Learned {
                                    id: word.id,
                                    word: word.word.clone(),
                                    review_queue_len: None,
                                });
                            }
                        });
                        ui.label(&word.meaning);
                        ui.label(format!(
                            "Learned {} · reviewed {} times",
                            format_date(word.learned_at),
                            word.review_count
                        ));
                    });
                }
            }
            ListFilter::Custom => {
                let view = custom_view(&self.custom_words, &self.list_query, self.list_sort);
                if view.is_empty() {
                    ui.label("No custom words match.");
                }
                for word in view {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(&word.word);
                            ui.label(&word.pronunciation);
                            if ui.small_button("Delete").clicked() {
                                remove = Some(PendingRemoval::Custom {
                                    id: word.id,
                                    word: word.word.clone(),
                                });
                            }
                        });
                        ui.label(&word.meaning);
                    });
                }
            }
        }

        if remove.is_some() {
            self.pending_removal = remove;
        }
    }

    /// Renders folder management and folder study
    fn render_folders(&mut self, ui: &mut egui::Ui) {
        if self.folder_session.is_some() {
            self.render_folder_study(ui);
            return;
        }

        ui.horizontal(|ui| {
            ui.label("New folder:");
            ui.text_edit_singleline(&mut self.new_folder_name);
            if ui.button("Create").clicked() {
                match db::create_folder(&self.new_folder_name, Utc::now(), &self.conn) {
                    Ok(Some(folder)) => {
                        self.folders.insert(0, folder);
                        self.new_folder_name.clear();
                    }
                    Ok(None) => {}
                    Err(e) => self.report_db_error("create the folder", e),
                }
            }
        });
        ui.separator();

        let mut action_select: Option<i64> = None;
        let mut action_delete: Option<PendingRemoval> = None;

        egui::ScrollArea::vertical()
            .id_source("folders_list")
            .max_height(150.0)
            .show(ui, |ui| {
                for folder in &self.folders {
                    ui.horizontal(|ui| {
                        let selected = self.selected_folder == Some(folder.id);
                        if ui.selectable_label(selected, &folder.name).clicked() {
                            action_select = Some(folder.id);
                        }
                        if ui.small_button("Delete").clicked() {
                            action_delete = Some(PendingRemoval::Folder {
                                id: folder.id,
                                name: folder.name.clone(),
                            });
                        }
                    });
                }
            });

        if let Some(id) = action_select {
            self.select_folder(id);
        }
        if action_delete.is_some() {
            self.pending_removal = action_delete;
        }

        let Some(folder_id) = self.selected_folder else {
            ui.label("Select a folder to see its words");
            return;
        };
        ui.separator();

        let mut action_study = false;
        let mut action_take_out: Option<i64> = None;
        let mut action_put_in: Option<i64> = None;

        ui.horizontal(|ui| {
            ui.heading(format!("Words ({})", self.folder_words.len()));
            if ui
                .add_enabled(!self.folder_words.is_empty(), egui::Button::new("Study"))
                .clicked()
            {
                action_study = true;
            }
        });
        for word in &self.folder_words {
            ui.horizontal(|ui| {
                ui.label(format!("{}: {}", word.word, word.meaning));
                if ui.small_button("Take out").clicked() {
                    action_take_out = Some(word.id);
                }
            });
        }

        let outside: Vec<&Word> = self
            .custom_words
            .iter()
            .filter(|w| !self.folder_words.iter().any(|f| f.id == w.id))
            .collect();
        if !outside.is_empty() {
            ui.separator();
            ui.label("Add your words to this folder:");
            for word in outside {
                ui.horizontal(|ui| {
                    ui.label(&word.word);
                    if ui.small_button("Add").clicked() {
                        action_put_in = Some(word.id);
                    }
                });
            }
        }

        if action_study {
            self.folder_session = Some(FolderSession::new(folder_id, self.folder_words.clone()));
        }
        if let Some(word_id) = action_take_out {
            if let Err(e) = db::remove_word_from_folder(folder_id, word_id, &self.conn) {
                self.report_db_error("take the word out of the folder", e);
            }
            self.select_folder(folder_id);
        }
        if let Some(word_id) = action_put_in {
            if let Err(e) = db::add_word_to_folder(folder_id, word_id, &self.conn) {
                self.report_db_error("add the word to the folder", e);
            }
            self.select_folder(folder_id);
        }
    }

    fn select_folder(&mut self, id: i64) {
        self.selected_folder = Some(id);
        match db::get_folder_words(id, &self.conn) {
            Ok(words) => self.folder_words = words,
            Err(e) => {
                self.folder_words.clear();
                self.report_db_error("load the folder", e);
            }
        }
    }

    fn render_folder_study(&mut self, ui: &mut egui::Ui) {
        let Some(session) = &mut self.folder_session else {
            return;
        };

        let mut action_back = false;
        let name = self
            .folders
            .iter()
            .find(|f| f.id == session.folder_id)
            .map(|f| f.name.as_str())
            .unwrap_or_default();

        ui.horizontal(|ui| {
            if ui.button("← Back to folders").clicked() {
                action_back = true;
            }
            ui.heading(name);
            ui.label(format!("{} / {}", session.current_index + 1, session.words.len()));
        });

        if let Some(word) = session.current().cloned() {
            ui.group(|ui| {
                ui.vertical_centered(|ui| {
                    word_header(ui, &word.word, &word.pronunciation, &word.audio_url);
                    let label = if session.show_meaning { "Hide meaning" } else { "Show meaning" };
                    if ui.button(label).clicked() {
                        session.toggle_meaning();
                    }
                    if session.show_meaning {
                        ui.label(&word.meaning);
                        examples_block(ui, &word.examples);
                    }
                });
            });

            ui.horizontal(|ui| {
                if ui.button("← Previous").clicked() {
                    session.previous();
                }
                if session.is_last() {
                    if ui.button("Finish").clicked() {
                        action_back = true;
                    }
                } else if ui.button("Next →").clicked() {
                    session.next();
                }
            });
        }

        if action_back {
            self.folder_session = None;
        }
    }

    /// Renders the "add word" window: look up, preview, optionally override the meaning
    fn render_add_dialog(&mut self, ctx: &egui::Context) {
        if !self.add_dialog.open {
            return;
        }

        let mut action_lookup = false;
        let mut action_add = false;
        let mut action_close = false;
        let mut action_go_to_set: Option<u32> = None;

        let headword = self.add_dialog.input.trim().to_lowercase();
        let in_set = self
            .word_sets
            .iter()
            .find(|s| s.headwords.iter().any(|h| *h == headword))
            .map(|s| (s.number, s.name.clone()));

        egui::Window::new("Add word")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.text_edit_singleline(&mut self.add_dialog.input);
                    let enter =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Look up").clicked() || enter {
                        action_lookup = true;
                    }
                });

                if let Some((number, name)) = &in_set {
                    ui.horizontal(|ui| {
                        ui.label(format!("Already in set \"{name}\""));
                        if ui.button("Go to set").clicked() {
                            action_go_to_set = Some(*number);
                        }
                    });
                }
                if self.add_dialog.loading {
                    ui.spinner();
                }
                if let Some(error) = &self.add_dialog.error {
                    ui.colored_label(egui::Color32::RED, error);
                }

                if let Some(entry) = &self.add_dialog.preview {
                    ui.separator();
                    word_header(ui, &entry.word, &entry.pronunciation, &entry.audio_url);
                    for meaning in &entry.meanings {
                        ui.label(format!("({}) {}", meaning.part_of_speech, meaning.definition));
                    }
                    examples_block(ui, &entry.examples);
                    ui.horizontal(|ui| {
                        ui.label("Your meaning (optional):");
                        ui.text_edit_singleline(&mut self.add_dialog.custom_meaning);
                    });

                    let folder_name = self
                        .add_dialog
                        .folder_id
                        .and_then(|id| self.folders.iter().find(|f| f.id == id))
                        .map(|f| f.name.clone())
                        .unwrap_or_else(|| "No folder".to_string());
                    egui::ComboBox::from_label("Folder")
                        .selected_text(folder_name)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.add_dialog.folder_id, None, "No folder");
                            for folder in &self.folders {
                                ui.selectable_value(
                                    &mut self.add_dialog.folder_id,
                                    Some(folder.id),
                                    &folder.name,
                                );
                            }
                        });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(self.add_dialog.preview.is_some(), egui::Button::new("Add"))
                        .clicked()
                    {
                        action_add = true;
                    }
                    if ui.button("Cancel").clicked() {
                        action_close = true;
                    }
                });
            });

        if action_lookup {
            let word = self.add_dialog.input.trim().to_string();
            if word.is_empty() {
                self.add_dialog.error = Some("Type a word first.".to_string());
            } else {
                match db::get_cached_entry(&word, &self.conn) {
                    Ok(Some(entry)) => self.add_dialog.show_cached(entry),
                    _ => {
                        self.add_dialog.begin_lookup(word.clone());
                        self.lookups.request(LookupTarget::NewWord, word);
                    }
                }
            }
        }
        if action_add {
            self.add_custom_word();
            action_close = true;
        }
        if let Some(number) = action_go_to_set {
            self.select_set(number);
            self.current_tab = Tab::Study;
            action_close = true;
        }
        if action_close {
            self.add_dialog = AddWordDialog::default();
        }
    }

    fn add_custom_word(&mut self) {
        let Some(entry) = self.add_dialog.preview.clone() else {
            return;
        };

        let mut word = Word::new(Utc::now().timestamp_millis(), entry.word.clone());
        word.is_custom = true;
        word.meaning = self.add_dialog.custom_meaning.trim().to_string();
        word.apply_entry(&entry);

        if let Err(e) = db::add_custom_word(&word, &self.conn) {
            self.report_db_error("add the word", e);
            return;
        }
        if let Err(e) = db::cache_entry(&entry.word, &entry, &self.conn) {
            tracing::warn!(word = %entry.word, "cache write failed: {e}");
        }
        if let Some(folder_id) = self.add_dialog.folder_id {
            if let Err(e) = db::add_word_to_folder(folder_id, word.id, &self.conn) {
                self.report_db_error("add the word to the folder", e);
            }
            if self.selected_folder == Some(folder_id) {
                self.select_folder(folder_id);
            }
        }
        self.custom_words.push(word);
        self.refresh_study();
    }

    /// Renders the confirmation window for a pending removal
    fn render_removal_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_removal else {
            return;
        };

        let question = match pending {
            PendingRemoval::Learned { word, .. } => {
                format!("Remove \"{word}\" from your learned words?")
            }
            PendingRemoval::Custom { word, .. } => {
                format!("Delete \"{word}\"? It will disappear from study mode and its folders.")
            }
            PendingRemoval::Folder { name, .. } => format!("Delete folder \"{name}\"?"),
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Please confirm")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(question);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                });
            });

        if cancelled {
            self.pending_removal = None;
        }
        if confirmed {
            if let Some(pending) = self.pending_removal.take() {
                self.remove(pending);
            }
        }
    }

    fn remove(&mut self, pending: PendingRemoval) {
        match pending {
            PendingRemoval::Learned {
                id,
                review_queue_len,
                ..
            } => match db::remove_learned_word(id, &self.conn) {
                Ok(()) => {
                    self.learned_words.retain(|w| w.id != id);
                    if let Some(len) = review_queue_len {
                        self.review.after_remove(len);
                    }
                }
                Err(e) => self.report_db_error("remove the word", e),
            },
            PendingRemoval::Custom { id, .. } => match db::remove_custom_word(id, &self.conn) {
                Ok(()) => {
                    self.custom_words.retain(|w| w.id != id);
                    self.folder_words.retain(|w| w.id != id);
                    self.refresh_study();
                }
                Err(e) => self.report_db_error("delete the word", e),
            },
            PendingRemoval::Folder { id, .. } => match db::delete_folder(id, &self.conn) {
                Ok(()) => {
                    self.folders.retain(|f| f.id != id);
                    if self.selected_folder == Some(id) {
                        self.selected_folder = None;
                        self.folder_words.clear();
                    }
                }
                Err(e) => self.report_db_error("delete the folder", e),
            },
        }
    }

    /// Saves the learned words to a JSON file
    fn handle_export(&mut self) {
        // Open file save dialog
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("learned-words.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        match export_learned_words(&self.learned_words, &path) {
            Ok(()) => self.show_result(format!(
                "Exported {} learned words.",
                self.learned_words.len()
            )),
            Err(e) => {
                tracing::error!("export failed: {e}");
                self.show_result(format!("Export failed: {e}"));
            }
        }
    }

    /// Merges learned words from a JSON file; words already learned keep their state
    fn handle_import(&mut self) {
        // Open file selection dialog
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        let words = match import_learned_words(&path) {
            Ok(words) => words,
            Err(e) => {
                tracing::error!("import failed: {e}");
                self.show_result(format!(
                    "Import failed: {e}\n\nExpected a list of learned words:\n{IMPORT_SHAPE}"
                ));
                return;
            }
        };

        let total = words.len();
        let result = db::restore_learned_words(&words, &self.conn)
            .and_then(|added| db::get_learned_words(&self.conn).map(|all| (added, all)));
        match result {
            Ok((added, all)) => {
                self.learned_words = all;
                self.show_result(format!(
                    "Imported {added} of {total} words ({} already learned).",
                    total - added
                ));
            }
            Err(e) => self.report_db_error("import the words", e),
        }
    }
}
