#![cfg(target_arch = "wasm32")]

use cipher_game::constants::STATE_STORAGE_KEY;
use cipher_web::{CipherApp, dom};
use serde_json::Value;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_app() -> CipherApp {
    dom::local_storage()
        .unwrap()
        .remove_item(STATE_STORAGE_KEY)
        .unwrap();
    CipherApp::new().unwrap()
}

fn view(value: wasm_bindgen::JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).unwrap()
}

#[wasm_bindgen_test]
fn facade_navigates_to_first_puzzle() {
    let app = fresh_app();
    assert_eq!(app.screen(), "landing");
    app.enter().unwrap();
    assert!(app.select_difficulty("hard").is_err());
    app.select_difficulty("easy").unwrap();
    let state = view(app.select_level(1).unwrap());
    assert_eq!(state["screen"], "game");
    assert_eq!(state["puzzle"]["id"], "easy-1");
}

#[wasm_bindgen_test]
async fn submitting_the_right_answer_reports_success() {
    let app = fresh_app();
    app.enter().unwrap();
    app.select_difficulty("easy").unwrap();
    app.select_level(1).unwrap();
    app.set_answer(" 10 ").unwrap();
    let state = view(JsFuture::from(app.submit_answer(None)).await.unwrap());
    assert_eq!(state["feedback"]["kind"], "correct");
}
