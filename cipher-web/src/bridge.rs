//! JavaScript-facing facade.
//!
//! `CipherApp` owns an [`AppController`] behind `Rc<RefCell<_>>` so that the
//! async submit future can hold it across timer awaits. Every method returns
//! the fresh view (or rejects with an error string) so the renderer only ever
//! redraws from one value.

use std::cell::RefCell;
use std::rc::Rc;

use cipher_game::constants::{ADVANCE_DELAY_MS, CLOCK_TICK_MS, ERROR_CLEAR_MS, SUBMIT_DELAY_MS};
use cipher_game::{Difficulty, Feedback, Language};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::controller::{AppController, SubmitTicket};
use crate::game::{WebProgressStorage, create_web_engine};
use crate::{dom, i18n, theme};

type SharedController = Rc<RefCell<AppController<WebProgressStorage>>>;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

fn render(controller: &SharedController) -> Result<JsValue, JsValue> {
    let view = controller.borrow().view();
    serde_wasm_bindgen::to_value(&view).map_err(to_js_error)
}

#[wasm_bindgen]
pub struct CipherApp {
    inner: SharedController,
}

#[wasm_bindgen]
impl CipherApp {
    /// Load the bundled catalog and resume stored progress.
    ///
    /// # Errors
    /// Rejects when the bundled catalog cannot be parsed.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CipherApp, JsValue> {
        let (catalog, session) = create_web_engine()
            .open_session()
            .map_err(|err| to_js_error(format!("{err:#}")))?;
        theme::apply_theme(session.dark_mode());
        let controller = AppController::new(catalog, session, i18n::current_language());
        Ok(Self {
            inner: Rc::new(RefCell::new(controller)),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn screen(&self) -> String {
        self.inner.borrow().screen().as_str().to_string()
    }

    /// Current view as a plain JS object.
    ///
    /// # Errors
    /// Rejects if the view cannot be converted.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        render(&self.inner)
    }

    /// # Errors
    /// Rejects if the view cannot be converted.
    pub fn enter(&self) -> Result<JsValue, JsValue> {
        self.inner.borrow_mut().enter();
        render(&self.inner)
    }

    /// # Errors
    /// Rejects if the view cannot be converted.
    pub fn back(&self) -> Result<JsValue, JsValue> {
        self.inner.borrow_mut().back();
        render(&self.inner)
    }

    /// # Errors
    /// Rejects for an unknown or locked difficulty.
    #[wasm_bindgen(js_name = selectDifficulty)]
    pub fn select_difficulty(&self, difficulty: &str) -> Result<JsValue, JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|()| to_js_error(format!("unknown difficulty '{difficulty}'")))?;
        self.inner
            .borrow_mut()
            .select_difficulty(difficulty)
            .map_err(to_js_error)?;
        render(&self.inner)
    }

    /// # Errors
    /// Rejects for a locked or nonexistent level.
    #[wasm_bindgen(js_name = selectLevel)]
    pub fn select_level(&self, level: u32) -> Result<JsValue, JsValue> {
        let mut controller = self.inner.borrow_mut();
        controller.select_level(level).map_err(to_js_error)?;
        controller.start_clock(now_ms());
        drop(controller);
        render(&self.inner)
    }

    /// Refresh interval for [`CipherApp::elapsed`], in milliseconds.
    #[wasm_bindgen(getter, js_name = clockTickMs)]
    pub fn clock_tick_ms(&self) -> u32 {
        CLOCK_TICK_MS
    }

    /// Time on the open puzzle as `m:ss`; `undefined` off the game screen.
    pub fn elapsed(&self) -> Option<String> {
        self.inner.borrow().elapsed_label(now_ms())
    }

    /// # Errors
    /// Rejects if the view cannot be converted.
    #[wasm_bindgen(js_name = setAnswer)]
    pub fn set_answer(&self, input: &str) -> Result<JsValue, JsValue> {
        self.inner.borrow_mut().set_answer(input);
        render(&self.inner)
    }

    /// # Errors
    /// Rejects if the view cannot be converted.
    #[wasm_bindgen(js_name = clearAnswer)]
    pub fn clear_answer(&self) -> Result<JsValue, JsValue> {
        self.inner.borrow_mut().clear_answer();
        render(&self.inner)
    }

    /// Submit the typed answer.
    ///
    /// Resolves with the view once the answer has been judged. A correct answer
    /// then advances after a pause and an incorrect one clears its message;
    /// `onChange` is called with the new view each time.
    #[wasm_bindgen(js_name = submitAnswer)]
    pub fn submit_answer(&self, on_change: Option<js_sys::Function>) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let claimed = inner.borrow_mut().begin_submit();
            let Some(ticket) = claimed else {
                return render(&inner);
            };
            if let Err(err) = dom::sleep_ms(SUBMIT_DELAY_MS).await {
                inner.borrow_mut().abort_submit(ticket);
                return Err(err);
            }
            let feedback = inner.borrow_mut().finish_submit(ticket);

            let follow_up = Rc::clone(&inner);
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = settle(&follow_up, ticket, feedback, on_change).await {
                    dom::console_error(&dom::js_error_message(&err));
                }
            });
            render(&inner)
        })
    }

    /// # Errors
    /// Rejects if the hint cannot be recorded.
    #[wasm_bindgen(js_name = revealHint)]
    pub fn reveal_hint(&self) -> Result<JsValue, JsValue> {
        self.inner.borrow_mut().reveal_hint().map_err(to_js_error)?;
        render(&self.inner)
    }

    /// Switch between the two puzzle languages.
    ///
    /// # Errors
    /// Rejects if the view cannot be converted.
    #[wasm_bindgen(js_name = toggleLanguage)]
    pub fn toggle_language(&self) -> Result<JsValue, JsValue> {
        let language = self.inner.borrow_mut().toggle_language();
        i18n::set_language(language);
        render(&self.inner)
    }

    /// # Errors
    /// Rejects if the preference cannot be stored.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> Result<JsValue, JsValue> {
        let dark_mode = self.inner.borrow_mut().toggle_theme().map_err(to_js_error)?;
        theme::apply_theme(dark_mode);
        render(&self.inner)
    }

    /// # Errors
    /// Rejects for an unknown language code.
    #[wasm_bindgen(js_name = setLanguage)]
    pub fn set_language(&self, code: &str) -> Result<JsValue, JsValue> {
        let language: Language = code
            .parse()
            .map_err(|()| to_js_error(format!("unknown language '{code}'")))?;
        i18n::set_language(language);
        self.inner.borrow_mut().set_language(language);
        render(&self.inner)
    }

    /// # Errors
    /// Rejects if the stored record cannot be removed.
    pub fn reset(&self) -> Result<JsValue, JsValue> {
        self.inner.borrow_mut().reset().map_err(to_js_error)?;
        theme::apply_theme(self.inner.borrow().session().dark_mode());
        render(&self.inner)
    }
}

#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
async fn settle(
    inner: &SharedController,
    ticket: SubmitTicket,
    feedback: Option<Feedback>,
    on_change: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    match feedback {
        Some(Feedback::Correct) => {
            dom::sleep_ms(ADVANCE_DELAY_MS).await?;
            inner.borrow_mut().advance(ticket).map_err(to_js_error)?;
        }
        Some(Feedback::Incorrect) => {
            dom::sleep_ms(ERROR_CLEAR_MS).await?;
            inner.borrow_mut().clear_feedback(ticket);
        }
        None => return Ok(()),
    }
    if let Some(callback) = on_change {
        callback.call1(&JsValue::NULL, &render(inner)?)?;
    }
    Ok(())
}
