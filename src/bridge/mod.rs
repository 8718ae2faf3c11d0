use crate::models::Note;
use crate::storage::{local_storage, NOTES_KEY};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

pub(crate) const DEFAULT_LOAD_CHANNEL: &str = "load-notes";
pub(crate) const DEFAULT_SAVE_CHANNEL: &str = "save-notes";
pub(crate) const DEFAULT_TOAST_MS: u32 = 3000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BridgeErrorKind {
    LoadFailed,
    SaveFailed,
}

#[derive(Clone, Debug)]
pub(crate) struct BridgeError {
    pub kind: BridgeErrorKind,
    pub message: String,
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            BridgeErrorKind::LoadFailed => "load failed",
            BridgeErrorKind::SaveFailed => "save failed",
        };
        write!(f, "{what}: {}", self.message)
    }
}

impl BridgeError {
    fn load(e: impl std::fmt::Display) -> Self {
        Self {
            kind: BridgeErrorKind::LoadFailed,
            message: e.to_string(),
        }
    }

    fn save(e: impl std::fmt::Display) -> Self {
        Self {
            kind: BridgeErrorKind::SaveFailed,
            message: e.to_string(),
        }
    }
}

pub(crate) type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BridgeKind {
    Host,
    Local,
    Memory,
}

impl BridgeKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "host" | "ipc" | "electron" | "tauri" => Some(Self::Host),
            "local" | "localstorage" | "storage" => Some(Self::Local),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

pub(crate) fn parse_toast_ms(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|ms| *ms > 0)
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    /// `None` means auto-detect.
    pub bridge: Option<BridgeKind>,
    pub load_channel: String,
    pub save_channel: String,
    pub storage_key: String,
    pub toast_ms: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            bridge: None,
            load_channel: DEFAULT_LOAD_CHANNEL.to_string(),
            save_channel: DEFAULT_SAVE_CHANNEL.to_string(),
            storage_key: NOTES_KEY.to_string(),
            toast_ms: DEFAULT_TOAST_MS,
        }
    }
}

impl EnvConfig {
    /// Read `window.ENV`. Each key is accepted as `NOTES_BRIDGE` or `notes_bridge`.
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        match env {
            Some(env) => Self::from_lookup(|key| {
                [key.to_string(), key.to_ascii_lowercase()]
                    .iter()
                    .filter_map(|k| js_sys::Reflect::get(&env, &JsValue::from_str(k)).ok())
                    .find_map(|v| {
                        v.as_string()
                            .or_else(|| v.as_f64().map(|n| (n as i64).to_string()))
                    })
            }),
            None => Self::default(),
        }
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Self {
            bridge: non_empty("NOTES_BRIDGE").and_then(|v| BridgeKind::parse(&v)),
            load_channel: non_empty("LOAD_CHANNEL").unwrap_or(defaults.load_channel),
            save_channel: non_empty("SAVE_CHANNEL").unwrap_or(defaults.save_channel),
            storage_key: non_empty("STORAGE_KEY").unwrap_or(defaults.storage_key),
            toast_ms: non_empty("TOAST_MS")
                .and_then(|v| parse_toast_ms(&v))
                .unwrap_or(defaults.toast_ms),
        }
    }
}

/// Where the note collection lives between sessions.
///
/// Every variant round-trips: `load_all` returns what the last `save_all` wrote.
#[derive(Clone, Debug)]
pub(crate) enum NotesBridge {
    /// Desktop shell reached through its `invoke` IPC.
    Host {
        load_channel: String,
        save_channel: String,
    },
    LocalStorage { key: String },
    /// Clones share one slot. `Arc<Mutex>` rather than `Rc<RefCell>` because the
    /// bridge lives in a `StoredValue`, which needs `Send + Sync`.
    Memory(Arc<Mutex<Option<Vec<Note>>>>),
}

impl NotesBridge {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(None)))
    }

    pub fn from_config(cfg: &EnvConfig) -> Self {
        let kind = cfg.bridge.unwrap_or_else(|| {
            if HostInvoke::resolve().is_some() {
                BridgeKind::Host
            } else if local_storage().is_some() {
                BridgeKind::Local
            } else {
                BridgeKind::Memory
            }
        });

        match kind {
            BridgeKind::Host => Self::Host {
                load_channel: cfg.load_channel.clone(),
                save_channel: cfg.save_channel.clone(),
            },
            BridgeKind::Local => Self::LocalStorage {
                key: cfg.storage_key.clone(),
            },
            BridgeKind::Memory => Self::memory(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Host { .. } => "host",
            Self::LocalStorage { .. } => "localStorage",
            Self::Memory(_) => "memory",
        }
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub async fn load_all(&self) -> BridgeResult<Option<Vec<Note>>> {
        match self {
            Self::Host { load_channel, .. } => {
                let host = HostInvoke::resolve()
                    .ok_or_else(|| BridgeError::load("host bridge is not available"))?;
                let value = host.call(load_channel, None).await.map_err(BridgeError::load)?;
                if value.is_null() || value.is_undefined() {
                    return Ok(None);
                }
                serde_wasm_bindgen::from_value::<Vec<Note>>(value)
                    .map(Some)
                    .map_err(BridgeError::load)
            }
            Self::LocalStorage { key } => {
                let storage =
                    local_storage().ok_or_else(|| BridgeError::load("localStorage unavailable"))?;
                let raw = storage
                    .get_item(key)
                    .map_err(|e| BridgeError::load(js_error_message(&e)))?;
                match raw {
                    Some(json) => serde_json::from_str::<Vec<Note>>(&json)
                        .map(Some)
                        .map_err(BridgeError::load),
                    None => Ok(None),
                }
            }
            Self::Memory(cell) => Ok(cell.lock().unwrap_or_else(PoisonError::into_inner).clone()),
        }
    }

    pub async fn save_all(&self, notes: &[Note]) -> BridgeResult<()> {
        match self {
            Self::Host { save_channel, .. } => {
                let host = HostInvoke::resolve()
                    .ok_or_else(|| BridgeError::save("host bridge is not available"))?;
                let payload = notes
                    .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                    .map_err(BridgeError::save)?;
                host.call(save_channel, Some(payload))
                    .await
                    .map(|_| ())
                    .map_err(BridgeError::save)
            }
            Self::LocalStorage { key } => {
                let storage =
                    local_storage().ok_or_else(|| BridgeError::save("localStorage unavailable"))?;
                let json = serde_json::to_string(notes).map_err(BridgeError::save)?;
                storage
                    .set_item(key, &json)
                    .map_err(|e| BridgeError::save(js_error_message(&e)))
            }
            Self::Memory(cell) => {
                *cell.lock().unwrap_or_else(PoisonError::into_inner) = Some(notes.to_vec());
                Ok(())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HostFlavor {
    /// `window.electron.ipcRenderer.invoke(channel, ...args)`
    Electron,
    /// `window.__TAURI__.core.invoke(cmd, { notes })`
    Tauri,
}

struct HostInvoke {
    this: JsValue,
    func: js_sys::Function,
    flavor: HostFlavor,
}

fn js_path(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut cur = root.clone();
    for key in path {
        let next = js_sys::Reflect::get(&cur, &JsValue::from_str(key)).ok()?;
        if next.is_undefined() || next.is_null() {
            return None;
        }
        cur = next;
    }
    Some(cur)
}

fn js_error_message(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{e:?}")
}

impl HostInvoke {
    fn resolve() -> Option<Self> {
        let window: JsValue = web_sys::window()?.into();

        let candidates = [
            (&["electron", "ipcRenderer"][..], HostFlavor::Electron),
            (&["__TAURI__", "core"][..], HostFlavor::Tauri),
        ];

        candidates.into_iter().find_map(|(path, flavor)| {
            let this = js_path(&window, path)?;
            let func = js_sys::Reflect::get(&this, &JsValue::from_str("invoke"))
                .ok()?
                .dyn_into::<js_sys::Function>()
                .ok()?;
            Some(Self { this, func, flavor })
        })
    }

    async fn call(&self, channel: &str, payload: Option<JsValue>) -> Result<JsValue, String> {
        let channel = JsValue::from_str(channel);
        let returned = match (payload, self.flavor) {
            (None, _) => self.func.call1(&self.this, &channel),
            (Some(p), HostFlavor::Electron) => self.func.call2(&self.this, &channel, &p),
            (Some(p), HostFlavor::Tauri) => {
                let args = js_sys::Object::new();
                js_sys::Reflect::set(&args, &JsValue::from_str("notes"), &p)
                    .map_err(|e| js_error_message(&e))?;
                self.func.call2(&self.this, &channel, &args)
            }
        }
        .map_err(|e| js_error_message(&e))?;

        // Hosts may answer synchronously; resolve() wraps either shape.
        JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(|e| js_error_message(&e))
    }
}
