//! In-memory mock surface for engine tests, in the spirit of a fake backend:
//! a top-level document plus a list of frame documents, with recorded
//! interactions so tests can assert on ordering and context hygiene.
#![allow(dead_code)]

use async_trait::async_trait;
use formcheck_engine::actions::SCROLL_INTO_VIEW;
use formcheck_engine::context::{SHADOW_ROOT_PROBE, SHADOW_SET_TEXT};
use formcheck_engine::locator::Locator;
use formcheck_engine::surface::{ElementHandle, ScriptArg, Surface, SurfaceError};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shadow {
    /// No shadow root attached.
    None,
    /// Shadow root present but empty.
    EmptyRoot,
    /// Shadow root with a textarea holding this value.
    Textarea(String),
}

#[derive(Debug, Clone)]
pub struct MockElement {
    pub value: String,
    pub selected: bool,
    /// Whether a click flips the selected state (false simulates an
    /// overlapped or disabled control).
    pub click_toggles: bool,
    /// When set, value read-back returns this instead of what was typed.
    pub sticky_value: Option<String>,
    pub shadow: Shadow,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            value: String::new(),
            selected: false,
            click_toggles: true,
            sticky_value: None,
            shadow: Shadow::None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockDoc {
    elements: HashMap<String, MockElement>,
    queries: HashMap<String, String>,
}

impl MockDoc {
    pub fn insert(&mut self, locator: &Locator, id: &str, element: MockElement) {
        self.elements.insert(id.to_string(), element);
        self.queries.insert(locator.to_string(), id.to_string());
    }

    /// Register an extra locator pointing at an already-inserted element.
    pub fn alias(&mut self, locator: &Locator, id: &str) {
        self.queries.insert(locator.to_string(), id.to_string());
    }

    pub fn element(&self, id: &str) -> &MockElement {
        &self.elements[id]
    }

    pub fn element_mut(&mut self, id: &str) -> &mut MockElement {
        self.elements.get_mut(id).expect("unknown mock element")
    }
}

#[derive(Debug, Default)]
pub struct MockSurface {
    pub top: MockDoc,
    pub frame_docs: Vec<MockDoc>,
    /// Frames whose queries fail with a script error.
    pub poisoned_frames: HashSet<usize>,
    pub fail_scroll: bool,
    /// None = top-level document.
    context: Option<usize>,
    pub navigated: Vec<String>,
    pub entered_frames: Vec<usize>,
    pub parent_returns: usize,
    pub top_resets: usize,
    pub clicks: Vec<String>,
    pub query_counts: HashMap<String, usize>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frames(count: usize) -> Self {
        let mut s = Self::default();
        s.frame_docs = (0..count).map(|_| MockDoc::default()).collect();
        s
    }

    pub fn at_top(&self) -> bool {
        self.context.is_none()
    }

    pub fn queries_for(&self, locator: &Locator) -> usize {
        self.query_counts
            .get(&locator.to_string())
            .copied()
            .unwrap_or(0)
    }

    fn doc(&self) -> &MockDoc {
        match self.context {
            None => &self.top,
            Some(i) => &self.frame_docs[i],
        }
    }

    fn doc_mut(&mut self) -> &mut MockDoc {
        match self.context {
            None => &mut self.top,
            Some(i) => &mut self.frame_docs[i],
        }
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Result<&mut MockElement, SurfaceError> {
        let id = handle.id().to_string();
        self.doc_mut()
            .elements
            .get_mut(&id)
            .ok_or(SurfaceError::Stale(id))
    }

    fn arg_element(args: &[ScriptArg], index: usize) -> Result<&ElementHandle, SurfaceError> {
        match args.get(index) {
            Some(ScriptArg::Element(h)) => Ok(h),
            _ => Err(SurfaceError::Script("expected element argument".into())),
        }
    }

    fn arg_text(args: &[ScriptArg], index: usize) -> Result<&str, SurfaceError> {
        match args.get(index) {
            Some(ScriptArg::Json(Value::String(s))) => Ok(s),
            _ => Err(SurfaceError::Script("expected string argument".into())),
        }
    }
}

#[async_trait]
impl Surface for MockSurface {
    async fn launch(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.navigated.push(url.to_string());
        Ok(())
    }

    async fn query(&mut self, locator: &Locator) -> Result<Option<ElementHandle>, SurfaceError> {
        let key = locator.to_string();
        *self.query_counts.entry(key.clone()).or_insert(0) += 1;

        if let Some(i) = self.context
            && self.poisoned_frames.contains(&i)
        {
            return Err(SurfaceError::Script(format!("frame {i} is broken")));
        }

        Ok(self
            .doc()
            .queries
            .get(&key)
            .map(|id| ElementHandle::new(id.clone())))
    }

    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, SurfaceError> {
        Ok(self.query(locator).await?.into_iter().collect())
    }

    async fn frames(&mut self) -> Result<Vec<ElementHandle>, SurfaceError> {
        if self.context.is_some() {
            return Ok(vec![]);
        }
        Ok((0..self.frame_docs.len())
            .map(|i| ElementHandle::new(format!("frame-{i}")))
            .collect())
    }

    async fn enter_frame(&mut self, frame: &ElementHandle) -> Result<(), SurfaceError> {
        let index: usize = frame
            .id()
            .strip_prefix("frame-")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SurfaceError::Frame(format!("not a frame handle: {frame}")))?;
        self.context = Some(index);
        self.entered_frames.push(index);
        Ok(())
    }

    async fn return_to_parent(&mut self) -> Result<(), SurfaceError> {
        self.context = None;
        self.parent_returns += 1;
        Ok(())
    }

    async fn return_to_top(&mut self) -> Result<(), SurfaceError> {
        self.context = None;
        self.top_resets += 1;
        Ok(())
    }

    async fn execute_script(
        &mut self,
        script: &str,
        args: Vec<ScriptArg>,
    ) -> Result<Value, SurfaceError> {
        if script == SCROLL_INTO_VIEW {
            if self.fail_scroll {
                return Err(SurfaceError::Script("scroll failed".into()));
            }
            return Ok(Value::Null);
        }
        if script == SHADOW_ROOT_PROBE {
            let host = Self::arg_element(&args, 0)?.clone();
            let element = self.element_mut(&host)?;
            return Ok(Value::Bool(element.shadow != Shadow::None));
        }
        if script == SHADOW_SET_TEXT {
            let host = Self::arg_element(&args, 0)?.clone();
            let _inner = Self::arg_text(&args, 1)?;
            let value = Self::arg_text(&args, 2)?.to_string();
            let element = self.element_mut(&host)?;
            return match &element.shadow {
                Shadow::None | Shadow::EmptyRoot => Ok(Value::Bool(false)),
                Shadow::Textarea(_) => {
                    element.shadow = Shadow::Textarea(value);
                    Ok(Value::Bool(true))
                }
            };
        }
        Err(SurfaceError::Script(format!("unknown script: {script}")))
    }

    async fn get_attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SurfaceError> {
        let el = self.element_mut(element)?;
        match name {
            "value" => Ok(Some(
                el.sticky_value.clone().unwrap_or_else(|| el.value.clone()),
            )),
            _ => Ok(None),
        }
    }

    async fn is_selected(&mut self, element: &ElementHandle) -> Result<bool, SurfaceError> {
        Ok(self.element_mut(element)?.selected)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SurfaceError> {
        self.clicks.push(element.id().to_string());
        let el = self.element_mut(element)?;
        if el.click_toggles {
            el.selected = !el.selected;
        }
        Ok(())
    }

    async fn clear(&mut self, element: &ElementHandle) -> Result<(), SurfaceError> {
        self.element_mut(element)?.value.clear();
        Ok(())
    }

    async fn send_text(
        &mut self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), SurfaceError> {
        self.element_mut(element)?.value.push_str(text);
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, SurfaceError> {
        Ok(vec![])
    }
}
