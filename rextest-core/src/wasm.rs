//! WebAssembly bindings for JavaScript
//!
//! Exposes the workbench to browser front ends. Enable with the "wasm"
//! feature flag.

use wasm_bindgen::prelude::*;

use crate::flags::FlagSet;
use crate::highlight::Highlight;
use crate::view::{self, ViewMode, ViewState};

/// JavaScript-facing workbench
#[wasm_bindgen(js_name = Workbench)]
pub struct JsWorkbench {
    inner: view::Workbench,
}

impl Default for JsWorkbench {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_class = Workbench)]
impl JsWorkbench {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsWorkbench {
        JsWorkbench {
            inner: view::Workbench::new(),
        }
    }

    #[wasm_bindgen(js_name = setPattern)]
    pub fn set_pattern(&mut self, pattern: &str) {
        self.inner.set_pattern(pattern);
    }

    /// Set the flags from a string such as `"gi"`
    #[wasm_bindgen(js_name = setFlags)]
    pub fn set_flags(&mut self, flags: &str) -> Result<(), JsValue> {
        let flags: FlagSet = flags
            .parse()
            .map_err(|e: crate::flags::FlagError| JsValue::from_str(&e.to_string()))?;
        self.inner.set_flags(flags);
        Ok(())
    }

    #[wasm_bindgen(js_name = setSubject)]
    pub fn set_subject(&mut self, subject: &str) {
        self.inner.set_subject(subject);
    }

    #[wasm_bindgen(js_name = setTemplate)]
    pub fn set_template(&mut self, template: &str) {
        self.inner.set_template(template);
    }

    /// Switch between `"match"` and `"replace"`
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = match mode {
            "match" => ViewMode::Match,
            "replace" => ViewMode::Replace,
            other => return Err(JsValue::from_str(&format!("unknown mode '{}'", other))),
        };
        self.inner.set_mode(mode);
        Ok(())
    }

    /// The current state as a plain object
    ///
    /// `kind` is one of `"idle"`, `"error"`, `"match"` or `"replace"`; the
    /// other fields are present when they apply to that kind. Every offset
    /// (`start`, `end`, error `position`) counts UTF-16 code units, so it
    /// indexes JavaScript strings directly.
    pub fn state(&self) -> Result<js_sys::Object, JsValue> {
        let inputs = self.inner.inputs();
        state_object(self.inner.state(), &inputs.spec.pattern, &inputs.subject)
    }

    #[wasm_bindgen(js_name = compileCount)]
    pub fn compile_count(&self) -> usize {
        self.inner.compile_count()
    }
}

/// Canonical flag string from six toggles
#[wasm_bindgen(js_name = composeFlags)]
pub fn compose_flags(g: bool, i: bool, m: bool, s: bool, u: bool, y: bool) -> String {
    FlagSet::from_toggles(g, i, m, s, u, y).to_flag_string()
}

fn set(obj: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    js_sys::Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

/// Byte offset to UTF-16 offset table for one string
struct Utf16Offsets {
    by_byte: Vec<usize>,
}

impl Utf16Offsets {
    fn new(text: &str) -> Self {
        let mut by_byte = vec![0; text.len() + 1];
        let mut units = 0;
        for (byte, c) in text.char_indices() {
            by_byte[byte] = units;
            units += c.len_utf16();
        }
        by_byte[text.len()] = units;
        Utf16Offsets { by_byte }
    }

    fn get(&self, byte: usize) -> JsValue {
        let units = self.by_byte.get(byte).copied().unwrap_or(0);
        JsValue::from_f64(units as f64)
    }
}

/// UTF-16 offset of the character at `index` (in chars)
fn char_index_to_utf16(text: &str, index: usize) -> usize {
    text.chars().take(index).map(char::len_utf16).sum()
}

fn state_object(
    state: &ViewState,
    pattern: &str,
    subject: &str,
) -> Result<js_sys::Object, JsValue> {
    let obj = js_sys::Object::new();
    match state {
        ViewState::Idle => set(&obj, "kind", &"idle".into())?,
        ViewState::Error(failure) => {
            set(&obj, "kind", &"error".into())?;
            let error = js_sys::Object::new();
            set(&error, "message", &failure.message.as_str().into())?;
            let position = failure
                .position
                .map_or(JsValue::NULL, |p| {
                    JsValue::from_f64(char_index_to_utf16(pattern, p) as f64)
                });
            set(&error, "position", &position)?;
            set(&obj, "error", &error)?;
        }
        ViewState::Match(view) => {
            set(&obj, "kind", &"match".into())?;
            let offsets = Utf16Offsets::new(subject);

            let matches = js_sys::Array::new();
            for m in &view.matches.matches {
                let record = js_sys::Object::new();
                set(&record, "text", &m.text.as_str().into())?;
                set(&record, "start", &offsets.get(m.start))?;
                set(&record, "end", &offsets.get(m.end))?;
                matches.push(&record);
            }
            set(&obj, "matches", &matches)?;

            let groups = js_sys::Array::new();
            for g in &view.matches.groups {
                let record = js_sys::Object::new();
                set(&record, "match", &JsValue::from_f64(g.match_index as f64))?;
                set(&record, "index", &JsValue::from_f64(g.index as f64))?;
                let name = g.name.as_deref().map_or(JsValue::NULL, JsValue::from_str);
                set(&record, "name", &name)?;
                set(&record, "text", &g.text.as_str().into())?;
                set(&record, "start", &offsets.get(g.start))?;
                set(&record, "end", &offsets.get(g.end))?;
                groups.push(&record);
            }
            set(&obj, "groups", &groups)?;

            let segments = js_sys::Array::new();
            for seg in &view.segments {
                let record = js_sys::Object::new();
                set(&record, "text", &seg.text.as_str().into())?;
                let matched = matches!(seg.kind, Highlight::Matched);
                set(&record, "matched", &JsValue::from_bool(matched))?;
                segments.push(&record);
            }
            set(&obj, "segments", &segments)?;
        }
        ViewState::Replace(view) => {
            set(&obj, "kind", &"replace".into())?;
            set(&obj, "output", &view.output.as_str().into())?;
            set(&obj, "replaced", &JsValue::from_f64(view.replaced as f64))?;
        }
    }
    Ok(obj)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn get(obj: &JsValue, key: &str) -> JsValue {
        js_sys::Reflect::get(obj, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_compose_flags() {
        assert_eq!(compose_flags(true, false, false, false, false, true), "gy");
        assert_eq!(compose_flags(false, false, false, false, false, false), "");
    }

    #[wasm_bindgen_test]
    fn test_workbench_match_state() {
        let mut bench = JsWorkbench::new();
        bench.set_flags("g").unwrap();
        bench.set_subject("aaa");
        bench.set_pattern("a");
        let state: JsValue = bench.state().unwrap().into();
        assert_eq!(get(&state, "kind").as_string().as_deref(), Some("match"));
        let matches: js_sys::Array = get(&state, "matches").into();
        assert_eq!(matches.length(), 3);
    }

    #[wasm_bindgen_test]
    fn test_offsets_count_utf16_units() {
        let mut bench = JsWorkbench::new();
        bench.set_flags("gu").unwrap();
        bench.set_subject("\u{1F600}\u{E9}b");
        bench.set_pattern("(b)");
        let state: JsValue = bench.state().unwrap().into();
        let matches: js_sys::Array = get(&state, "matches").into();
        let first = matches.get(0);
        assert_eq!(get(&first, "start").as_f64(), Some(3.0));
        assert_eq!(get(&first, "end").as_f64(), Some(4.0));
        let groups: js_sys::Array = get(&state, "groups").into();
        assert_eq!(get(&groups.get(0), "start").as_f64(), Some(3.0));
    }

    #[wasm_bindgen_test]
    fn test_error_position_counts_utf16_units() {
        let mut bench = JsWorkbench::new();
        bench.set_pattern("\u{1F600}(");
        let state: JsValue = bench.state().unwrap().into();
        let error = get(&state, "error");
        let expected = char_index_to_utf16("\u{1F600}(", 1) as f64;
        assert_eq!(expected, 2.0);
        assert!(get(&error, "position").as_f64().is_some());
    }

    #[wasm_bindgen_test]
    fn test_utf16_offset_table() {
        let offsets = Utf16Offsets::new("a\u{E9}\u{1F600}z");
        assert_eq!(offsets.by_byte[0], 0);
        assert_eq!(offsets.by_byte[1], 1);
        assert_eq!(offsets.by_byte[3], 2);
        assert_eq!(offsets.by_byte[7], 4);
        assert_eq!(offsets.by_byte[8], 5);
    }

    #[wasm_bindgen_test]
    fn test_workbench_error_state() {
        let mut bench = JsWorkbench::new();
        bench.set_pattern("(");
        let state: JsValue = bench.state().unwrap().into();
        assert_eq!(get(&state, "kind").as_string().as_deref(), Some("error"));
    }

    #[wasm_bindgen_test]
    fn test_workbench_replace_state() {
        let mut bench = JsWorkbench::new();
        bench.set_mode("replace").unwrap();
        bench.set_subject("foo");
        bench.set_template("0");
        bench.set_flags("g").unwrap();
        bench.set_pattern("o");
        let state: JsValue = bench.state().unwrap().into();
        assert_eq!(get(&state, "output").as_string().as_deref(), Some("f00"));
        assert_eq!(get(&state, "replaced").as_f64(), Some(2.0));
        assert!(bench.set_mode("other").is_err());
    }
}
