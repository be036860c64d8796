//! In-page scripts for the CDP backend
//!
//! Scripts are evaluated as plain expressions and always return a JSON
//! string, so `null` survives the trip through `Runtime.evaluate`.
//! Resolved elements are kept in a page-global registry of weak references;
//! the DOM of the application under test is never modified.

use serde::Deserialize;

use crate::common::Result;
use crate::scenario::Locator;

/// Shared helpers: registry, visibility, roles, accessible names
const PRELUDE: &str = r#"
const REG = window.__uiproof || (window.__uiproof = { seq: 0, byId: new Map(), ids: new WeakMap() });
const norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
const textOf = (el) => norm(el.innerText !== undefined ? el.innerText : el.textContent);
const isVisible = (el) => {
  if (!el.isConnected) return false;
  const style = window.getComputedStyle(el);
  if (style.visibility !== 'visible') return false;
  const rect = el.getBoundingClientRect();
  return rect.width > 0 && rect.height > 0;
};
const implicitRole = (el) => {
  const tag = el.tagName.toLowerCase();
  const type = (el.getAttribute('type') || '').toLowerCase();
  switch (tag) {
    case 'button': return 'button';
    case 'a': case 'area': return el.hasAttribute('href') ? 'link' : null;
    case 'input':
      if (['button', 'submit', 'reset', 'image'].includes(type)) return 'button';
      if (type === 'checkbox') return 'checkbox';
      if (type === 'radio') return 'radio';
      if (type === 'range') return 'slider';
      if (type === 'number') return 'spinbutton';
      if (type === 'search') return el.hasAttribute('list') ? 'combobox' : 'searchbox';
      if (['', 'text', 'email', 'tel', 'url'].includes(type)) return el.hasAttribute('list') ? 'combobox' : 'textbox';
      return null;
    case 'textarea': return 'textbox';
    case 'select': return (el.multiple || el.size > 1) ? 'listbox' : 'combobox';
    case 'h1': case 'h2': case 'h3': case 'h4': case 'h5': case 'h6': return 'heading';
    case 'dialog': return 'dialog';
    case 'ul': case 'ol': return 'list';
    case 'li': return 'listitem';
    case 'nav': return 'navigation';
    case 'main': return 'main';
    case 'header': return el.closest('article,aside,main,nav,section') ? null : 'banner';
    case 'footer': return el.closest('article,aside,main,nav,section') ? null : 'contentinfo';
    case 'img': return el.getAttribute('alt') === '' ? 'presentation' : 'img';
    case 'table': return 'table';
    case 'option': return 'option';
    case 'progress': return 'progressbar';
    default: return null;
  }
};
const roleOf = (el) => {
  const explicit = norm(el.getAttribute('role')).split(' ')[0];
  return explicit || implicitRole(el);
};
const NAME_FROM_CONTENT = new Set(['button', 'link', 'menuitem', 'menuitemcheckbox', 'menuitemradio',
  'option', 'tab', 'heading', 'cell', 'columnheader', 'rowheader', 'checkbox', 'radio', 'switch',
  'treeitem', 'tooltip']);
// label text without aria-hidden decoration such as a required asterisk;
// works on a detached copy
const labelTextOf = (el) => {
  const copy = el.cloneNode(true);
  for (const hidden of copy.querySelectorAll('[aria-hidden]:not([aria-hidden=false])')) hidden.remove();
  return norm(copy.textContent);
};
const labelNames = (el) => {
  const names = [];
  const labelledBy = el.getAttribute('aria-labelledby');
  if (labelledBy) {
    const joined = norm(labelledBy.split(/\s+/).map((id) => document.getElementById(id))
      .filter(Boolean).map(labelTextOf).join(' '));
    if (joined) names.push(joined);
  }
  const ariaLabel = norm(el.getAttribute('aria-label'));
  if (ariaLabel) names.push(ariaLabel);
  if (el.labels) for (const label of el.labels) { const t = labelTextOf(label); if (t) names.push(t); }
  return names;
};
const accessibleName = (el) => {
  const fromLabels = labelNames(el);
  if (fromLabels.length) return fromLabels[0];
  const tag = el.tagName.toLowerCase();
  if (tag === 'input') {
    const type = (el.getAttribute('type') || '').toLowerCase();
    if (['button', 'submit', 'reset'].includes(type)) return norm(el.value);
    if (type === 'image') return norm(el.getAttribute('alt'));
    return norm(el.getAttribute('title') || el.getAttribute('placeholder'));
  }
  if (tag === 'img') return norm(el.getAttribute('alt'));
  if (NAME_FROM_CONTENT.has(roleOf(el))) return textOf(el);
  return norm(el.getAttribute('title'));
};
// form controls only; containers such as dialogs carry labels too
const LABELLED_CONTROLS = ['input:not([type=hidden])', 'textarea', 'select',
  '[contenteditable]:not([contenteditable=false])', '[role=textbox]', '[role=searchbox]',
  '[role=combobox]', '[role=spinbutton]', '[role=slider]', '[role=checkbox]', '[role=radio]',
  '[role=switch]', '[role=listbox]'].join(',');
const SKIP = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE']);
const elements = () => Array.from(document.querySelectorAll('body *')).filter((el) => !SKIP.has(el.tagName));
const lookup = (id) => {
  const ref = REG.byId.get(id);
  return ref ? ref.deref() : undefined;
};
"#;

/// Returns `{"id", "tag"}` for the first visible match, or `null`
const PROBE: &str = r#"
(function (locator) {
  __PRELUDE__
  const ranked = [];
  const push = (el, rank) => { if (isVisible(el)) ranked.push({ el, rank }); };
  if (locator.by === 'role') {
    for (const el of elements()) {
      if (roleOf(el) === locator.role && accessibleName(el) === locator.name) push(el, 0);
    }
  } else if (locator.by === 'text') {
    const needle = norm(locator.text);
    for (const el of elements()) {
      const text = textOf(el);
      if (!text.includes(needle)) continue;
      // innermost element carrying the text
      if (Array.from(el.children).some((child) => textOf(child).includes(needle))) continue;
      push(el, text === needle ? 0 : 1);
    }
  } else if (locator.by === 'label') {
    const needle = norm(locator.label);
    for (const el of document.querySelectorAll(LABELLED_CONTROLS)) {
      const names = labelNames(el);
      if (names.some((n) => n === needle)) push(el, 0);
      else if (names.some((n) => n.includes(needle))) push(el, 1);
    }
  }
  if (!ranked.length) return JSON.stringify(null);
  // stable sort keeps document order within a rank
  ranked.sort((a, b) => a.rank - b.rank);
  const el = ranked[0].el;
  let id = REG.ids.get(el);
  if (!id) {
    REG.seq += 1;
    id = 'h' + REG.seq;
    REG.ids.set(el, id);
    REG.byId.set(id, new WeakRef(el));
  }
  return JSON.stringify({ id, tag: el.tagName.toLowerCase() });
})(__ARGS__)
"#;

/// Scrolls the element into view and reports where a click would land
const ACTIONABLE: &str = r#"
(function (id) {
  __PRELUDE__
  const el = lookup(id);
  if (!el || !el.isConnected) return JSON.stringify({ status: 'detached' });
  if (el.disabled || el.getAttribute('aria-disabled') === 'true') return JSON.stringify({ status: 'disabled' });
  el.scrollIntoView({ block: 'center', inline: 'center' });
  if (!isVisible(el)) return JSON.stringify({ status: 'hidden' });
  const rect = el.getBoundingClientRect();
  const x = rect.left + rect.width / 2;
  const y = rect.top + rect.height / 2;
  const hit = document.elementFromPoint(x, y);
  if (!hit || !(hit === el || el.contains(hit))) {
    const by = hit ? hit.tagName.toLowerCase() + (hit.id ? '#' + hit.id : '') : 'nothing';
    return JSON.stringify({ status: 'covered', detail: by });
  }
  return JSON.stringify({ status: 'ok', x, y });
})(__ARGS__)
"#;

/// Replaces the value of an input, textarea or contenteditable element
const FILL: &str = r#"
(function (id, value) {
  __PRELUDE__
  const el = lookup(id);
  if (!el || !el.isConnected) return JSON.stringify({ status: 'detached' });
  const tag = el.tagName.toLowerCase();
  const type = (el.getAttribute('type') || '').toLowerCase();
  const textInput = tag === 'input' && !['checkbox', 'radio', 'button', 'submit', 'reset', 'image',
    'file', 'hidden', 'range', 'color'].includes(type);
  if (!(textInput || tag === 'textarea' || el.isContentEditable)) {
    return JSON.stringify({ status: 'not_editable', detail: tag });
  }
  if (el.disabled) return JSON.stringify({ status: 'disabled' });
  if (el.readOnly) return JSON.stringify({ status: 'readonly' });
  el.scrollIntoView({ block: 'center', inline: 'center' });
  el.focus();
  if (el.isContentEditable) {
    el.textContent = value;
    el.dispatchEvent(new InputEvent('input', { bubbles: true }));
  } else {
    // the prototype setter keeps framework-controlled inputs in sync
    const proto = tag === 'textarea' ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
    Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, value);
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
  }
  return JSON.stringify({ status: 'ok' });
})(__ARGS__)
"#;

fn render(template: &str, args: &[String]) -> String {
    template
        .replace("__PRELUDE__", PRELUDE)
        .replace("__ARGS__", &args.join(", "))
}

/// Script probing for the first visible match of `locator`
pub fn probe(locator: &Locator) -> Result<String> {
    Ok(render(PROBE, &[serde_json::to_string(locator)?]))
}

/// Script checking that the element can receive a click
pub fn actionable(id: &str) -> Result<String> {
    Ok(render(ACTIONABLE, &[serde_json::to_string(id)?]))
}

/// Script replacing the element's value
pub fn fill(id: &str, value: &str) -> Result<String> {
    Ok(render(
        FILL,
        &[serde_json::to_string(id)?, serde_json::to_string(value)?],
    ))
}

/// Result of [`probe`]
#[derive(Debug, Deserialize, PartialEq)]
pub struct ProbeHit {
    pub id: String,
    pub tag: String,
}

/// Result of [`actionable`] and [`fill`]
#[derive(Debug, Deserialize)]
pub struct ActionStatus {
    pub status: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl ActionStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Human-readable reason for a refused action
    pub fn reason(&self) -> String {
        let base = match self.status.as_str() {
            "detached" => "element is no longer attached to the page",
            "disabled" => "element is disabled",
            "hidden" => "element is not visible",
            "covered" => "element is covered by another element",
            "not_editable" => "element is not a text-entry control",
            "readonly" => "element is read-only",
            other => other,
        };
        match &self.detail {
            Some(detail) => format!("{} ({})", base, detail),
            None => base.to_string(),
        }
    }
}
