use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use crate::error::BridgeError;

/// Name of the script message channel pages post to:
/// `window.webkit.messageHandlers.callbackHandler.postMessage("...")`.
pub const CALLBACK_CHANNEL: &str = "callbackHandler";

/// Message the load-failure page posts when its Retry button is pressed.
pub const RETRY_MESSAGE: &str = "retry";

/// What a viewer displays. The caller picks the mode; it is never inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerSource {
    Url(Url),
    /// Raw markup, loaded without a base URI: relative references do not
    /// resolve.
    Markup(String),
}

impl ViewerSource {
    /// Whether `other` uses the same mode (URL or markup) as `self`.
    pub fn same_mode(&self, other: &ViewerSource) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn url(&self) -> Option<&Url> {
        match self {
            ViewerSource::Url(url) => Some(url),
            ViewerSource::Markup(_) => None,
        }
    }
}

/// Check that a script message payload is a string.
pub fn decode_payload(payload: &Value) -> Result<&str, BridgeError> {
    match payload {
        Value::String(s) => Ok(s),
        other => Err(BridgeError::NonStringPayload(value_kind(other))),
    }
}

/// Decode a payload the web engine handed over as JSON text.
pub fn decode_json_payload(json: &str) -> Result<String, BridgeError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| BridgeError::MalformedJson(e.to_string()))?;
    decode_payload(&value).map(str::to_string)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

type MessageHandler = Box<dyn Fn(&str)>;

/// Routes script messages to host callbacks by channel name. Kept separate
/// from the web view so decode and dispatch work without a browser engine.
#[derive(Default)]
pub struct MessageBridge {
    handlers: HashMap<String, MessageHandler>,
}

impl MessageBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `channel`, replacing any previous handler.
    pub fn register<F>(&mut self, channel: &str, handler: F)
    where
        F: Fn(&str) + 'static,
    {
        if self
            .handlers
            .insert(channel.to_string(), Box::new(handler))
            .is_some()
        {
            log::debug!("Replaced handler for channel '{}'", channel);
        }
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn is_registered(&self, channel: &str) -> bool {
        self.handlers.contains_key(channel)
    }

    /// Decode `payload` and hand it to the channel's handler. Non-string
    /// payloads are rejected and the handler is not called.
    pub fn deliver(&self, channel: &str, payload: &Value) -> Result<(), BridgeError> {
        let handler = self
            .handlers
            .get(channel)
            .ok_or_else(|| BridgeError::UnknownChannel(channel.to_string()))?;
        let message = decode_payload(payload)?;
        handler(message);
        Ok(())
    }

    /// `deliver` for payloads that arrive as JSON text.
    pub fn deliver_json(&self, channel: &str, json: &str) -> Result<(), BridgeError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| BridgeError::MalformedJson(e.to_string()))?;
        self.deliver(channel, &value)
    }
}

/// Page shown in place of content that failed to load. Its Retry button
/// posts [`RETRY_MESSAGE`] on [`CALLBACK_CHANNEL`].
pub fn load_failure_markup(uri: &str, error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; padding: 2em; color: #666;">
<h3>Could not load this article</h3>
<p><code>{uri}</code></p>
<p>{error}</p>
<button onclick="window.webkit.messageHandlers.{channel}.postMessage('{retry}')">Retry</button>
</body>
</html>"#,
        uri = escape_html(uri),
        error = escape_html(error),
        channel = CALLBACK_CHANNEL,
        retry = RETRY_MESSAGE,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_bridge() -> (MessageBridge, Rc<RefCell<Vec<String>>>) {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = MessageBridge::new();
        let sink = received.clone();
        bridge.register(CALLBACK_CHANNEL, move |msg| {
            sink.borrow_mut().push(msg.to_string())
        });
        (bridge, received)
    }

    #[test]
    fn string_payload_is_delivered_once() {
        let (bridge, received) = recording_bridge();
        bridge.deliver(CALLBACK_CHANNEL, &json!("ping")).unwrap();
        assert_eq!(*received.borrow(), vec!["ping".to_string()]);
    }

    #[test]
    fn non_string_payloads_are_dropped() {
        let (bridge, received) = recording_bridge();
        for payload in [json!(42), json!(null), json!(true), json!(["ping"]), json!({"a": 1})] {
            let err = bridge.deliver(CALLBACK_CHANNEL, &payload).unwrap_err();
            assert!(matches!(err, BridgeError::NonStringPayload(_)));
        }
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn unknown_channel_is_an_error() {
        let (bridge, received) = recording_bridge();
        assert_eq!(
            bridge.deliver("other", &json!("ping")),
            Err(BridgeError::UnknownChannel("other".to_string()))
        );
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn json_text_payloads() {
        let (bridge, received) = recording_bridge();
        bridge.deliver_json(CALLBACK_CHANNEL, r#""hello""#).unwrap();
        assert!(matches!(
            bridge.deliver_json(CALLBACK_CHANNEL, "{oops"),
            Err(BridgeError::MalformedJson(_))
        ));
        assert!(matches!(
            bridge.deliver_json(CALLBACK_CHANNEL, "3.5"),
            Err(BridgeError::NonStringPayload("number"))
        ));
        assert_eq!(*received.borrow(), vec!["hello".to_string()]);

        assert_eq!(decode_json_payload(r#""x""#).unwrap(), "x");
    }

    #[test]
    fn reregistering_replaces_handler() {
        let (mut bridge, first) = recording_bridge();
        let second = Rc::new(RefCell::new(0));
        let counter = second.clone();
        bridge.register(CALLBACK_CHANNEL, move |_| *counter.borrow_mut() += 1);
        bridge.deliver(CALLBACK_CHANNEL, &json!("ping")).unwrap();
        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), 1);
        assert_eq!(bridge.channels().count(), 1);
        assert!(bridge.is_registered(CALLBACK_CHANNEL));
    }

    #[test]
    fn failure_page_escapes_and_posts_retry() {
        let page = load_failure_markup(
            "https://example.com/article/1?a=<b>",
            "Host \"x\" not found",
        );
        assert!(page.contains("&lt;b&gt;"));
        assert!(page.contains("&quot;x&quot;"));
        assert!(page.contains("messageHandlers.callbackHandler.postMessage('retry')"));
    }

    #[test]
    fn source_modes() {
        let url = Url::parse("https://example.com/article/5").unwrap();
        assert_eq!(ViewerSource::Url(url.clone()).url(), Some(&url));
        assert_eq!(ViewerSource::Markup("<p>hi</p>".into()).url(), None);
    }

    #[test]
    fn mode_is_compared_by_variant_only() {
        let a = ViewerSource::Url(Url::parse("https://example.com/article/1").unwrap());
        let b = ViewerSource::Url(Url::parse("https://example.com/article/2").unwrap());
        let markup = ViewerSource::Markup("<p>hi</p>".into());
        assert!(a.same_mode(&b));
        assert!(markup.same_mode(&ViewerSource::Markup(String::new())));
        assert!(!a.same_mode(&markup));
        assert!(!markup.same_mode(&a));
    }
}
