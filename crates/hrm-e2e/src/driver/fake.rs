// FakeBrowser - In-memory scripted DOM implementing BrowserDriver
//
// Offline stand-in for a browser tab. A test registers page builders per
// route path; navigation rebuilds the DOM from the matching builder. Nodes
// declare which selectors they answer to, and can carry click/fill handlers
// that mutate the scene, navigate, or schedule deferred effects on the tokio
// clock (toasts that appear late, spinners that vanish).
//
// Matching rules:
// - a node matches a `Selector` it declared via `FakeNode::matches`
// - `Selector::Text` also matches nodes whose own text contains the value
// - `Selector::Attribute` / `Placeholder` also match on node attributes
// - `Step::HasText` filters by the node's full text (own + descendants)
//
// Element operations are strict: more than one match is an error, the way
// Playwright's strict mode reports it. Click/fill wait (on the tokio clock)
// for the element to exist and be visible before failing.

use crate::driver::{BrowserDriver, Selector, SelectorChain, Step};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Index of a node in a `FakeDom`
pub type NodeId = usize;

/// The document node every page hangs off
pub const ROOT: NodeId = 0;

/// Scene mutation run by handlers, page builders and deferred effects
pub type Effect = Arc<dyn Fn(&mut FakeScene) + Send + Sync>;

/// Minimal PNG signature returned by `screenshot`
pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Element description used when building a fake page
#[derive(Clone, Default)]
pub struct FakeNode {
    matchers: Vec<Selector>,
    text: String,
    value: String,
    hidden: bool,
    attributes: HashMap<String, String>,
    on_click: Option<Effect>,
    on_fill: Option<Effect>,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element answering to a CSS selector
    pub fn css(css: &str) -> Self {
        Self::new().matches(Selector::css(css))
    }

    pub fn matches(mut self, selector: Selector) -> Self {
        self.matchers.push(selector);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut FakeScene) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(f));
        self
    }

    /// Runs after the value has been replaced.
    pub fn on_fill<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut FakeScene) + Send + Sync + 'static,
    {
        self.on_fill = Some(Arc::new(f));
        self
    }

    fn own_match(&self, selector: &Selector) -> bool {
        if self.matchers.contains(selector) {
            return true;
        }
        match selector {
            Selector::Text(t) => !t.is_empty() && contains_ci(&self.text, t),
            Selector::Placeholder(p) => self
                .attributes
                .get("placeholder")
                .is_some_and(|v| v.eq_ignore_ascii_case(p)),
            Selector::Attribute {
                name,
                value,
                contains,
            } => self.attributes.get(name).is_some_and(|v| {
                if *contains {
                    contains_ci(v, value)
                } else {
                    v == value
                }
            }),
            _ => false,
        }
    }
}

struct Slot {
    node: FakeNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removed: bool,
}

/// Node tree of the current page
pub struct FakeDom {
    slots: Vec<Slot>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: FakeNode::new(),
                parent: None,
                children: Vec::new(),
                removed: false,
            }],
        }
    }

    /// Appends `node` as the last child of `parent` and returns its id.
    pub fn append(&mut self, parent: NodeId, node: FakeNode) -> NodeId {
        let id = self.slots.len();
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
            removed: false,
        });
        self.slots[parent].children.push(id);
        id
    }

    /// Detaches a node (and its subtree) from the document.
    pub fn remove(&mut self, id: NodeId) {
        if id == ROOT || self.slots[id].removed {
            return;
        }
        self.slots[id].removed = true;
        if let Some(parent) = self.slots[id].parent {
            self.slots[parent].children.retain(|c| *c != id);
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.slots[id].node.text = text.into();
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.slots[id].node.value = value.into();
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.slots[id].node.hidden = !visible;
    }

    pub fn value(&self, id: NodeId) -> &str {
        &self.slots[id].node.value
    }

    /// Own text of a node (without descendants)
    pub fn own_text(&self, id: NodeId) -> &str {
        &self.slots[id].node.text
    }

    /// Children of a node, in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id].children
    }

    /// Own text followed by every descendant's text, space separated.
    pub fn full_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(id, &mut parts);
        parts.join(" ")
    }

    fn collect_text(&self, id: NodeId, parts: &mut Vec<String>) {
        let text = self.slots[id].node.text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        for child in &self.slots[id].children {
            self.collect_text(*child, parts);
        }
    }

    fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            let slot = &self.slots[node];
            if slot.removed || slot.node.hidden {
                return false;
            }
            current = slot.parent;
        }
        true
    }

    fn descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.slots[id].children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    /// Resolves a chain to matching node ids, in document order.
    pub fn resolve(&self, chain: &SelectorChain) -> Vec<NodeId> {
        let mut current = vec![ROOT];
        for step in chain.steps() {
            current = match step {
                Step::Query(selector) => {
                    let mut found = Vec::new();
                    for scope in &current {
                        let mut all = Vec::new();
                        self.descendants(*scope, &mut all);
                        for id in all {
                            if self.slots[id].node.own_match(selector) && !found.contains(&id) {
                                found.push(id);
                            }
                        }
                    }
                    found
                }
                Step::Nth(index) => {
                    let picked = if *index < 0 {
                        current.len().checked_sub(index.unsigned_abs() as usize)
                    } else {
                        Some(*index as usize)
                    };
                    picked
                        .and_then(|i| current.get(i).copied())
                        .into_iter()
                        .collect()
                }
                Step::HasText(text) => current
                    .into_iter()
                    .filter(|id| contains_ci(&self.full_text(*id), text))
                    .collect(),
            };
        }
        current
    }

    /// First node matching a single selector anywhere in the document.
    pub fn find(&self, selector: Selector) -> Option<NodeId> {
        self.resolve(&SelectorChain::new(selector)).first().copied()
    }
}

struct Deferred {
    at: Instant,
    effect: Effect,
}

/// Mutable state of the fake tab, handed to every effect
pub struct FakeScene {
    base_url: String,
    url: String,
    title: String,
    dom: FakeDom,
    pages: Vec<(String, Effect)>,
    pending: Vec<Deferred>,
    target: Option<NodeId>,
}

impl FakeScene {
    pub fn dom(&mut self) -> &mut FakeDom {
        &mut self.dom
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Node whose handler is running, if any
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Client-side navigation to a route path under the base URL.
    pub fn navigate(&mut self, path: &str) {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        self.load(url);
    }

    /// Changes the URL without rebuilding the DOM (history push).
    pub fn push_url(&mut self, path: &str) {
        self.url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
    }

    /// Schedules `effect` to run `delay` from now on the tokio clock.
    pub fn after<F>(&mut self, delay: Duration, effect: F)
    where
        F: Fn(&mut FakeScene) + Send + Sync + 'static,
    {
        self.pending.push(Deferred {
            at: Instant::now() + delay,
            effect: Arc::new(effect),
        });
    }

    fn load(&mut self, url: String) {
        self.pending.clear();
        self.dom = FakeDom::new();
        self.title = String::new();
        self.url = url;

        let path = self.url.split(['?', '#']).next().unwrap_or_default().to_string();
        let builder = self
            .pages
            .iter()
            .filter(|(route, _)| path.ends_with(route.as_str()) || route_prefix_match(&path, route))
            .max_by_key(|(route, _)| route.len())
            .map(|(_, effect)| Arc::clone(effect));

        match builder {
            Some(build) => build(self),
            None => tracing::debug!(url = %self.url, "FakeBrowser has no page for URL"),
        }
    }

    fn advance(&mut self) {
        let now = Instant::now();
        loop {
            let Some(pos) = self.pending.iter().position(|d| d.at <= now) else {
                break;
            };
            let deferred = self.pending.remove(pos);
            (deferred.effect)(self);
        }
    }

    fn single(&self, chain: &SelectorChain) -> Result<NodeId> {
        let ids = self.dom.resolve(chain);
        match ids.as_slice() {
            [id] => Ok(*id),
            [] => Err(Error::Driver(format!("No element matches '{}'", chain))),
            many => Err(Error::Driver(format!(
                "strict mode violation: '{}' resolved to {} elements",
                chain,
                many.len()
            ))),
        }
    }
}

// Routes registered with a trailing '*' match any path starting with the prefix
fn route_prefix_match(path: &str, route: &str) -> bool {
    route
        .strip_suffix('*')
        .is_some_and(|prefix| path.contains(prefix))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// In-memory browser tab
pub struct FakeBrowser {
    scene: Mutex<FakeScene>,
    history: Mutex<Vec<String>>,
    broken: Mutex<bool>,
    closed: Mutex<bool>,
}

impl FakeBrowser {
    /// Creates a blank tab; `base_url` is what `FakeScene::navigate` builds on.
    pub fn new(base_url: &str) -> Self {
        Self {
            scene: Mutex::new(FakeScene {
                base_url: base_url.to_string(),
                url: "about:blank".to_string(),
                title: String::new(),
                dom: FakeDom::new(),
                pages: Vec::new(),
                pending: Vec::new(),
                target: None,
            }),
            history: Mutex::new(Vec::new()),
            broken: Mutex::new(false),
            closed: Mutex::new(false),
        }
    }

    /// Registers a page builder for a route path.
    ///
    /// A URL is served by the longest registered path it ends with. A path
    /// ending in `*` is a prefix route (`/pim/viewPersonalDetails/empNumber/*`).
    pub fn with_page<F>(self, path: &str, build: F) -> Self
    where
        F: Fn(&mut FakeScene) + Send + Sync + 'static,
    {
        self.scene
            .lock()
            .pages
            .push((path.to_string(), Arc::new(build)));
        self
    }

    /// Runs `f` against the live scene (after applying due effects).
    pub fn update<R>(&self, f: impl FnOnce(&mut FakeScene) -> R) -> R {
        let mut scene = self.scene.lock();
        scene.advance();
        f(&mut scene)
    }

    /// Makes every query fail, as a crashed renderer would.
    pub fn set_broken(&self, broken: bool) {
        *self.broken.lock() = broken;
    }

    /// Calls made so far, e.g. `"goto:https://..."`, `"click:.oxd-button"`
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn calls(&self, prefix: &str) -> usize {
        self.history
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls(prefix) > 0
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }

    fn record(&self, call: String) {
        self.history.lock().push(call);
    }

    fn check(&self) -> Result<()> {
        if *self.closed.lock() {
            return Err(Error::Driver("Target page has been closed".into()));
        }
        if *self.broken.lock() {
            return Err(Error::Driver("Renderer crashed".into()));
        }
        Ok(())
    }

    fn query<T>(&self, f: impl FnOnce(&FakeScene) -> Result<T>) -> Result<T> {
        self.check()?;
        let mut scene = self.scene.lock();
        scene.advance();
        f(&scene)
    }

    /// Waits on the tokio clock for a single visible match.
    async fn actionable(&self, chain: &SelectorChain, timeout: Duration) -> Result<NodeId> {
        let deadline = Instant::now() + timeout;
        loop {
            self.check()?;
            let last_error = {
                let mut scene = self.scene.lock();
                scene.advance();
                match scene.single(chain) {
                    Ok(id) if scene.dom.is_visible(id) => return Ok(id),
                    Ok(_) => format!("'{}' is not visible", chain),
                    Err(e) => e.to_string(),
                }
            };
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    what: last_error,
                    waited: timeout,
                });
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    fn run_handler(&self, id: NodeId, pick: fn(&FakeNode) -> Option<Effect>) {
        let mut scene = self.scene.lock();
        if let Some(effect) = pick(&scene.dom.slots[id].node) {
            scene.target = Some(id);
            effect(&mut scene);
            scene.target = None;
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.check()?;
        self.record(format!("goto:{}", url));
        self.scene.lock().load(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.query(|s| Ok(s.url.clone()))
    }

    async fn title(&self) -> Result<String> {
        self.query(|s| Ok(s.title.clone()))
    }

    async fn count(&self, selector: &SelectorChain) -> Result<usize> {
        self.query(|s| Ok(s.dom.resolve(selector).len()))
    }

    async fn is_visible(&self, selector: &SelectorChain) -> Result<bool> {
        self.query(|s| {
            let ids = s.dom.resolve(selector);
            match ids.as_slice() {
                [] => Ok(false),
                [id] => Ok(s.dom.is_visible(*id)),
                _ => s.single(selector).map(|_| false),
            }
        })
    }

    async fn text_content(&self, selector: &SelectorChain) -> Result<Option<String>> {
        self.query(|s| s.single(selector).map(|id| Some(s.dom.full_text(id))))
    }

    async fn input_value(&self, selector: &SelectorChain) -> Result<String> {
        self.query(|s| s.single(selector).map(|id| s.dom.value(id).to_string()))
    }

    async fn get_attribute(&self, selector: &SelectorChain, name: &str) -> Result<Option<String>> {
        self.query(|s| {
            s.single(selector)
                .map(|id| s.dom.slots[id].node.attributes.get(name).cloned())
        })
    }

    async fn click(&self, selector: &SelectorChain, timeout: Duration) -> Result<()> {
        self.record(format!("click:{}", selector));
        let id = self.actionable(selector, timeout).await?;
        self.run_handler(id, |n| n.on_click.clone());
        Ok(())
    }

    async fn fill(&self, selector: &SelectorChain, value: &str, timeout: Duration) -> Result<()> {
        self.record(format!("fill:{}={}", selector, value));
        let id = self.actionable(selector, timeout).await?;
        self.scene.lock().dom.set_value(id, value);
        self.run_handler(id, |n| n.on_fill.clone());
        Ok(())
    }

    async fn press(&self, selector: &SelectorChain, key: &str, timeout: Duration) -> Result<()> {
        self.record(format!("press:{}={}", selector, key));
        self.actionable(selector, timeout).await?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.check()?;
        self.record("screenshot".to_string());
        Ok(FAKE_PNG.to_vec())
    }

    async fn close(&self) -> Result<()> {
        self.record("close".to_string());
        *self.closed.lock() = true;
        Ok(())
    }
}
