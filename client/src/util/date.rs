//! Default title text: today's date formatted for the `bn-BD` locale.
//!
//! Requires a browser environment; formatting goes through `Intl` so the
//! month name comes out in Bengali (e.g. "২৫ ডিসেম্বর, ২০২৪"). Falls back to
//! a plain numeric date if the `Intl` call fails.

use wasm_bindgen::JsValue;

/// Today's date as the card's default title line.
#[must_use]
pub fn today_bengali() -> String {
    let now = js_sys::Date::new_0();
    bengali_format(&now).unwrap_or_else(|| fallback_format(&now))
}

fn bengali_format(date: &js_sys::Date) -> Option<String> {
    let locales = js_sys::Array::of1(&JsValue::from_str("bn-BD"));
    let options = js_sys::Object::new();
    for (key, value) in [("day", "numeric"), ("month", "long"), ("year", "numeric")] {
        js_sys::Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(value)).ok()?;
    }
    let formatter = js_sys::Intl::DateTimeFormat::new(&locales, &options);
    let formatted = formatter.format().call1(&JsValue::UNDEFINED, date).ok()?;
    formatted.as_string()
}

fn fallback_format(date: &js_sys::Date) -> String {
    format!("{}/{}/{}", date.get_date(), date.get_month() + 1, date.get_full_year())
}
