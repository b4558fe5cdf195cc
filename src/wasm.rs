#![cfg(target_arch = "wasm32")]

use crate::input::{
    parse_attempt_count, parse_bulk_entries, parse_picker_date, require_word, single_entry,
};
use crate::service::display_date;
use crate::store::LocalStorageSlot;
use crate::{
    AnswerOutcome, ClientConfig, DateLookup, Lookup, LookupAction, PasskeyGate, QuizSession,
    SessionStatus, WordEntry, WordLookup, WordPairStore, WordService, demo_word_pairs,
};
use chrono::NaiveDate;
use gloo_net::http::Request;
use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::*;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

type BrowserStore = StoredValue<WordPairStore<LocalStorageSlot>>;

const CONFIG_PATH: &str = "wordly.json";

async fn load_config() -> ClientConfig {
    let response = match Request::get(CONFIG_PATH).send().await {
        Ok(response) if response.ok() => response,
        Ok(response) => {
            log::info!("no {CONFIG_PATH} (status {}), using defaults", response.status());
            return ClientConfig::default();
        }
        Err(error) => {
            log::info!("could not load {CONFIG_PATH}: {error}");
            return ClientConfig::default();
        }
    };

    match response.text().await {
        Ok(raw) => ClientConfig::from_json_or_default(&raw),
        Err(error) => {
            log::warn!("could not read {CONFIG_PATH}: {error}");
            ClientConfig::default()
        }
    }
}

fn fresh_rng() -> rand::rngs::StdRng {
    rand::rngs::StdRng::from_entropy()
}

fn button_label(
    loading: bool,
    shown: bool,
    busy: &'static str,
    hide: &'static str,
    idle: &'static str,
) -> &'static str {
    if loading {
        busy
    } else if shown {
        hide
    } else {
        idle
    }
}

#[component]
fn WordPairList(entries: Vec<WordEntry>) -> impl IntoView {
    view! {
        <ul class="word-list">
            {entries
                .into_iter()
                .map(|entry| {
                    view! {
                        <li class="word-row">
                            <strong>{format!("{}:", entry.word)}</strong>
                            " "
                            {entry.synonym_list()}
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}

fn lookup_message<T: 'static>(lookup: RwSignal<Lookup<T>>) -> Signal<Option<String>> {
    Signal::derive(move || lookup.with(|lookup| lookup.message().map(str::to_string)))
}

#[component]
fn InlineMessage(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message
            .get()
            .map(|text| view! { <p class="error-body">{text}</p> })
    }
}

#[component]
fn WordPairsPanel(
    service: WordService,
    store: BrowserStore,
    cached: RwSignal<Vec<WordEntry>>,
) -> impl IntoView {
    let (loading, set_loading) = create_signal(false);
    let (shown, set_shown) = create_signal(false);
    let (error, set_error) = create_signal::<Option<String>>(None);

    let fetch = move |_| {
        if shown.get() {
            set_shown.set(false);
            return;
        }

        set_loading.set(true);
        set_error.set(None);
        let service = service.clone();

        spawn_local(async move {
            let fetched = service.fetch_all().await;
            let failure = fetched.as_ref().err().map(|error| error.to_string());
            let mut replaced = false;
            store.update_value(|store| replaced = store.refresh(fetched));

            if replaced {
                cached.set(store.with_value(|store| store.snapshot()));
                set_shown.set(true);
            } else {
                let message = failure.unwrap_or_else(|| "Could not save word pairs".to_string());
                set_error.set(Some(message));
            }
            set_loading.set(false);
        });
    };

    let load_demo = move |_| {
        let mut result = Ok(());
        store.update_value(|store| result = store.replace_all(demo_word_pairs()));

        match result {
            Ok(()) => {
                cached.set(store.with_value(|store| store.snapshot()));
                set_error.set(None);
                set_shown.set(true);
            }
            Err(error) => set_error.set(Some(error.to_string())),
        }
    };

    let label = move || {
        button_label(
            loading.get(),
            shown.get(),
            "Loading...",
            "Hide Word Pairs",
            "Fetch Word Pairs",
        )
    };

    view! {
        <section class="panel">
            <div class="header-actions">
                <button class="btn btn-primary" on:click=fetch disabled=move || loading.get()>
                    {label}
                </button>
                <button class="pill" on:click=load_demo disabled=move || loading.get()>
                    "Use demo words"
                </button>
            </div>
            <InlineMessage message=error />
            {move || shown.get().then(|| view! { <WordPairList entries=cached.get() /> })}
        </section>
    }
}

#[component]
fn SearchPanel(service: WordService) -> impl IntoView {
    let (word, set_word) = create_signal(String::new());
    let lookup = create_rw_signal(WordLookup::for_word());

    let search = move |_| {
        if lookup.try_update(WordLookup::press) != Some(LookupAction::Fetch) {
            return;
        }

        let query = match require_word(&word.get_untracked()) {
            Ok(query) => query,
            Err(error) => {
                lookup.update(|lookup| lookup.reject(error));
                return;
            }
        };

        let service = service.clone();
        spawn_local(async move {
            let found = service.search(&query).await;
            lookup.update(|lookup| lookup.apply(found));
        });
    };

    let label = move || {
        let (loading, shown) = lookup.with(|lookup| (lookup.is_loading(), lookup.is_shown()));
        button_label(loading, shown, "Searching...", "Hide Search Result", "Search")
    };

    view! {
        <section class="panel">
            <h3 class="headline">"Search for a Word"</h3>
            <input
                type="text"
                placeholder="Enter a word"
                prop:value=move || word.get()
                on:input=move |ev| set_word.set(event_target_value(&ev))
            />
            <button
                class="btn btn-primary"
                on:click=search
                disabled=move || lookup.with(WordLookup::is_loading)
            >
                {label}
            </button>
            {move || {
                lookup
                    .with(|lookup| lookup.shown().cloned())
                    .map(|entry| view! { <WordPairList entries=vec![entry] /> })
            }}
            <InlineMessage message=lookup_message(lookup) />
        </section>
    }
}

#[component]
fn DatePanel(service: WordService) -> impl IntoView {
    let (date, set_date) = create_signal::<Option<NaiveDate>>(None);
    let (picker_error, set_picker_error) = create_signal::<Option<String>>(None);
    let lookup = create_rw_signal(DateLookup::for_date());

    let pick = move |ev: web_sys::Event| match parse_picker_date(&event_target_value(&ev)) {
        Ok(value) => {
            set_picker_error.set(None);
            set_date.set(value);
        }
        Err(error) => {
            set_date.set(None);
            set_picker_error.set(Some(error.to_string()));
        }
    };

    let search = move |_| {
        if lookup.try_update(DateLookup::press) != Some(LookupAction::Fetch) {
            return;
        }

        let Some(selected) = date.get_untracked() else {
            lookup.update(|lookup| lookup.reject(crate::InputError::MissingDate));
            return;
        };

        let service = service.clone();
        spawn_local(async move {
            let found = service.words_by_date(selected).await;
            lookup.update(|lookup| lookup.apply(found));
        });
    };

    let picked_label = move || {
        date.get()
            .map(display_date)
            .unwrap_or_else(|| "Select a date".to_string())
    };

    let label = move || {
        let (loading, shown) = lookup.with(|lookup| (lookup.is_loading(), lookup.is_shown()));
        button_label(loading, shown, "Loading...", "Hide Date Word Pairs", "Search by Date")
    };

    view! {
        <section class="panel">
            <h3 class="headline">"Search Words by Date"</h3>
            <input type="date" on:change=pick />
            <span class="label">
                {picked_label}
            </span>
            <button
                class="btn btn-primary"
                on:click=search
                disabled=move || lookup.with(DateLookup::is_loading) || date.get().is_none()
            >
                {label}
            </button>
            {move || {
                lookup
                    .with(|lookup| lookup.shown().map(|words| words.entries().to_vec()))
                    .map(|entries| view! { <WordPairList entries=entries /> })
            }}
            <InlineMessage message=picker_error />
            <InlineMessage message=lookup_message(lookup) />
        </section>
    }
}

#[component]
fn AdminPanel(service: WordService, passkey: String) -> impl IntoView {
    let gate = create_rw_signal(PasskeyGate::new(passkey));
    let (attempt, set_attempt) = create_signal(String::new());
    let (date, set_date) = create_signal::<Option<NaiveDate>>(None);
    let (word, set_word) = create_signal(String::new());
    let (synonyms, set_synonyms) = create_signal(String::new());
    let (bulk, set_bulk) = create_signal(String::new());
    let (loading, set_loading) = create_signal(false);
    let (message, set_message) = create_signal::<Option<String>>(None);

    let unlock = move |_| {
        let outcome = gate.try_update(|gate| gate.unlock(&attempt.get_untracked()));
        match outcome {
            Some(Err(error)) => set_message.set(Some(error.to_string())),
            _ => set_message.set(None),
        }
        set_attempt.set(String::new());
    };

    let submit = move |entries: Result<Vec<WordEntry>, crate::InputError>| {
        let request = entries
            .map_err(crate::AdminError::from)
            .and_then(|entries| {
                gate.with_untracked(|gate| gate.prepare_submission(date.get_untracked(), entries))
            });

        let request = match request {
            Ok(request) => request,
            Err(error) => {
                set_message.set(Some(error.to_string()));
                return;
            }
        };

        set_loading.set(true);
        set_message.set(None);
        let service = service.clone();

        spawn_local(async move {
            match service.add_words(&request).await {
                Ok(()) => {
                    let added = request.words.entries().len();
                    set_message.set(Some(format!("Added {added} word pairs")));
                    set_word.set(String::new());
                    set_synonyms.set(String::new());
                    set_bulk.set(String::new());
                }
                Err(error) => {
                    log::error!("error adding words: {error}");
                    set_message.set(Some(error.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    let submit_single = {
        let submit = submit.clone();
        move |_| {
            let entry = single_entry(&word.get_untracked(), &synonyms.get_untracked());
            submit(entry.map(|entry| vec![entry]))
        }
    };
    let submit_bulk = move |_| submit(parse_bulk_entries(&bulk.get_untracked()));

    view! {
        <section class="panel">
            <h3 class="headline">"Add Words"</h3>
            {move || {
                if gate.with(PasskeyGate::is_unlocked) {
                    view! {
                        <div class="admin-forms">
                            <input
                                type="date"
                                on:change=move |ev| {
                                    let picked = parse_picker_date(&event_target_value(&ev));
                                    set_date.set(picked.ok().flatten());
                                }
                            />
                            <div class="admin-single">
                                <input
                                    type="text"
                                    placeholder="Word"
                                    prop:value=move || word.get()
                                    on:input=move |ev| set_word.set(event_target_value(&ev))
                                />
                                <input
                                    type="text"
                                    placeholder="Synonyms, comma separated"
                                    prop:value=move || synonyms.get()
                                    on:input=move |ev| set_synonyms.set(event_target_value(&ev))
                                />
                                <button
                                    class="btn btn-primary"
                                    on:click=submit_single.clone()
                                    disabled=move || loading.get()
                                >
                                    "Add word"
                                </button>
                            </div>
                            <div class="admin-bulk">
                                <textarea
                                    placeholder="word: synonym, synonym"
                                    prop:value=move || bulk.get()
                                    on:input=move |ev| set_bulk.set(event_target_value(&ev))
                                ></textarea>
                                <button
                                    class="btn btn-primary"
                                    on:click=submit_bulk.clone()
                                    disabled=move || loading.get()
                                >
                                    "Add all"
                                </button>
                            </div>
                            <button class="pill" on:click=move |_| gate.update(PasskeyGate::lock)>
                                "Lock"
                            </button>
                        </div>
                    }
                    .into_view()
                } else {
                    view! {
                        <div class="admin-gate">
                            <input
                                type="password"
                                placeholder="Passkey"
                                prop:value=move || attempt.get()
                                on:input=move |ev| set_attempt.set(event_target_value(&ev))
                            />
                            <button class="btn btn-primary" on:click=unlock>
                                "Unlock"
                            </button>
                        </div>
                    }
                    .into_view()
                }
            }}
            <InlineMessage message=message />
        </section>
    }
}

#[component]
fn QuizPanel(
    store: BrowserStore,
    cached: RwSignal<Vec<WordEntry>>,
    feedback_delay: std::time::Duration,
) -> impl IntoView {
    let session = create_rw_signal(QuizSession::new());
    let (count, set_count) = create_signal(String::new());
    let (selected, set_selected) = create_signal::<Option<String>>(None);
    let (error, set_error) = create_signal::<Option<String>>(None);
    let timer = store_value::<Option<TimeoutHandle>>(None);

    let cancel_timer = move || {
        if let Some(handle) = timer.get_value() {
            handle.clear();
        }
        timer.set_value(None);
    };

    let configure = move |_| {
        cancel_timer();
        set_error.set(None);
        if let Some(Err(error)) = session.try_update(QuizSession::configure) {
            set_error.set(Some(error.to_string()));
        }
    };

    let begin = move |_| {
        let count = match parse_attempt_count(&count.get_untracked()) {
            Ok(count) => count,
            Err(error) => {
                set_error.set(Some(error.to_string()));
                return;
            }
        };

        let pool = store.with_value(|store| store.snapshot());
        let mut rng = fresh_rng();
        match session.try_update(|session| session.start(&mut rng, &pool, count)) {
            Some(Err(error)) => set_error.set(Some(error.to_string())),
            _ => {
                set_error.set(None);
                set_selected.set(None);
            }
        }
    };

    let submit = move |_| {
        let answer = selected.get_untracked();
        let mut rng = fresh_rng();
        let outcome = session.try_update(|session| session.submit(&mut rng, answer.as_deref()));

        match outcome {
            Some(Ok(AnswerOutcome::Incorrect { ticket, .. })) => {
                let advance = move || {
                    timer.set_value(None);
                    let mut rng = fresh_rng();
                    session.update(|session| {
                        session.advance(&mut rng, ticket);
                    });
                    set_selected.set(None);
                };

                match set_timeout_with_handle(advance, feedback_delay) {
                    Ok(handle) => timer.set_value(Some(handle)),
                    Err(error) => log::error!("could not schedule next question: {error:?}"),
                }
            }
            Some(Ok(AnswerOutcome::Finished { feedback: Some(_), .. })) => {
                set_selected.set(None);
                let dismiss = move || {
                    timer.set_value(None);
                    session.update(QuizSession::dismiss_feedback);
                };

                match set_timeout_with_handle(dismiss, feedback_delay) {
                    Ok(handle) => timer.set_value(Some(handle)),
                    Err(error) => log::error!("could not schedule feedback dismissal: {error:?}"),
                }
            }
            Some(Ok(_)) => set_selected.set(None),
            Some(Err(error)) => set_error.set(Some(error.to_string())),
            None => {}
        }
    };

    let clear_results = move |_| {
        cancel_timer();
        let mut outcome = Ok(());
        store.update_value(|store| {
            session.update(|session| outcome = session.reset(store));
        });
        if let Err(error) = outcome {
            log::error!("failed to clear cached word pairs: {error}");
            set_error.set(Some(error.to_string()));
        }
        cached.set(store.with_value(|store| store.snapshot()));
        set_selected.set(None);
        set_count.set(String::new());
    };

    view! {
        <section class="panel quiz-card">
            <h3 class="headline">"Quiz"</h3>
            {move || match session.with(QuizSession::status) {
                SessionStatus::Idle => view! {
                    <div class="prompt-area">
                        <p class="lede">
                            {move || format!("{} cached word pairs", cached.get().len())}
                        </p>
                        <button class="btn btn-primary" on:click=configure>"Start Quiz"</button>
                    </div>
                }
                .into_view(),
                SessionStatus::Configuring => view! {
                    <div class="prompt-area">
                        <input
                            type="number"
                            min="1"
                            placeholder="Number of questions"
                            prop:value=move || count.get()
                            on:input=move |ev| set_count.set(event_target_value(&ev))
                        />
                        <button class="btn btn-primary" on:click=begin>"Begin"</button>
                        <button
                            class="pill"
                            on:click=move |_| session.update(QuizSession::cancel_configuration)
                        >
                            "Cancel"
                        </button>
                    </div>
                }
                .into_view(),
                SessionStatus::InProgress | SessionStatus::AwaitingAdvance => {
                    let (position, total) = session.with(QuizSession::progress).unwrap_or((0, 0));
                    let word = session.with(|session| {
                        session.current_question().map(|question| question.word.clone())
                    });
                    let options = session.with(|session| session.options().to_vec());
                    let waiting = session.with(|session| session.feedback().is_some());
                    let prompt = word.map(|word| format!("What is a synonym for '{word}'?"));

                    view! {
                        <div class="prompt-area">
                            <p class="eyebrow">{format!("Question {position}/{total}")}</p>
                            <p class="prompt">{prompt}</p>
                        </div>
                        <div class="options-grid">
                            {options
                                .into_iter()
                                .enumerate()
                                .map(|(index, option)| {
                                    let value = option.clone();
                                    let checked = option.clone();
                                    let is_checked = move || {
                                        selected.get().as_deref() == Some(checked.as_str())
                                    };
                                    view! {
                                        <label class="option">
                                            <input
                                                type="radio"
                                                name="quiz-option"
                                                disabled=waiting
                                                prop:checked=is_checked
                                                on:change=move |_| set_selected.set(Some(value.clone()))
                                            />
                                            <span class="option-index">{(index + 1).to_string()}</span>
                                            <span class="option-body">{option}</span>
                                        </label>
                                    }
                                })
                                .collect_view()}
                        </div>
                        <button class="btn btn-primary" on:click=submit disabled=waiting>
                            "Submit Answer"
                        </button>
                        <button class="pill" on:click=clear_results>"Quit"</button>
                    }
                    .into_view()
                }
                SessionStatus::Finished => {
                    let report = session.with(|session| session.report().cloned());
                    view! {
                        <div class="prompt-area">
                            <p class="eyebrow">"Quiz finished"</p>
                            <p class="prompt">{report.as_ref().map(|report| report.summary())}</p>
                        </div>
                        <ul class="word-list">
                            {report
                                .map(|report| report.incorrect_records)
                                .unwrap_or_default()
                                .into_iter()
                                .map(|record| {
                                    view! {
                                        <li class="word-row">
                                            <strong>{record.question.word.clone()}</strong>
                                            {format!(
                                                " - your answer: {}, correct answer: {}",
                                                record.user_answer, record.correct_answer,
                                            )}
                                            {format!(
                                                " (all synonyms: {})",
                                                record.all_synonyms.join(", ")
                                            )}
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                        <button class="btn btn-primary" on:click=configure>"New Quiz"</button>
                        <button class="pill" on:click=clear_results>"Clear Results"</button>
                    }
                    .into_view()
                }
            }}
            {move || {
                session
                    .with(|session| session.feedback().map(|feedback| feedback.message()))
                    .map(|message| {
                        view! { <div class="feedback-text feedback-wrong">{message}</div> }
                    })
            }}
            <InlineMessage message=error />
        </section>
    }
}

#[component]
fn App(config: ClientConfig) -> impl IntoView {
    let service = WordService::new(config.api_base.clone());
    let slot = LocalStorageSlot::new(config.cache_key.clone());
    let store: BrowserStore = store_value(WordPairStore::open(slot));
    let cached = create_rw_signal(store.with_value(|store| store.snapshot()));

    view! {
        <main class="page">
            <header class="page-header">
                <h1 class="headline">"WORDLY"</h1>
            </header>
            <WordPairsPanel service=service.clone() store=store cached=cached />
            <SearchPanel service=service.clone() />
            <DatePanel service=service.clone() />
            <AdminPanel service=service passkey=config.passkey.clone() />
            <QuizPanel store=store cached=cached feedback_delay=config.feedback_delay() />
        </main>
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    spawn_local(async {
        let config = load_config().await;
        log::info!("word service at {}", config.api_base);
        mount_to_body(move || view! { <App config=config /> });
    });
}
