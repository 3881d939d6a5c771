//! Fragment formatting and the resolving sink that turns method tokens into symbol fragments.

use tracing::debug;

use crate::model::SemanticModel;
use crate::resolver::resolve;
use crate::types::Fragment;
use crate::writer::TraceSink;

/// Render `symbol` as display fragments, attaching accessor methods to their keyword.
///
/// Generic display machinery shows an accessor as `Owner.X.get` with the `get`
/// part unattached. A symbolless fragment whose text, joined to the associated
/// property or event name with `_`, spells the method's own name gets the
/// method as its symbol.
pub fn format_fragments<M: SemanticModel>(model: &M, symbol: &M::Symbol) -> Vec<Fragment<M::Symbol>> {
    let associated = model.associated_symbol(symbol);
    let method_name = model.name(symbol);

    return model
        .display_parts(symbol)
        .into_iter()
        .map(|part| {
            let symbol = match (part.symbol, &associated) {
                (Some(own), _) => Some(own),
                (None, Some(owner))
                    if format!("{}_{}", part.text, model.name(owner)) == method_name =>
                {
                    Some(symbol.clone())
                },
                (None, _) => None,
            };
            return Fragment {
                symbol,
                text: part.text,
            };
        })
        .collect();
}

/// A trace sink that can also receive text bound to a resolved symbol.
pub trait SymbolSink<M: SemanticModel>: TraceSink {
    /// Text that denotes `symbol`, owned by `model`.
    fn write_symbol(&mut self, text: &str, symbol: &M::Symbol, model: &M);
}

/// Adapts a [`SymbolSink`] into a [`TraceSink`] that resolves method tokens.
///
/// Unresolvable tokens are forwarded verbatim as text, so the output is never
/// worse than the input.
pub struct ResolvingSink<'m, M: SemanticModel, S> {
    /// Models searched in order.
    models: &'m [M],
    /// Where fragments and text end up.
    sink: S,
}

impl<'m, M: SemanticModel, S: SymbolSink<M>> ResolvingSink<'m, M, S> {
    /// Wrap `sink`, resolving against `models`.
    pub const fn new(models: &'m [M], sink: S) -> Self {
        return Self { models, sink };
    }

    /// Recover the inner sink.
    pub fn into_inner(self) -> S {
        return self.sink;
    }
}

impl<M: SemanticModel, S: SymbolSink<M>> TraceSink for ResolvingSink<'_, M, S> {
    fn write_method(&mut self, signature: &str) {
        let resolved = match resolve(self.models, signature) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(signature, %err, "frame left unresolved");
                self.sink.write_text(signature);
                return;
            },
        };

        for fragment in format_fragments(resolved.model, &resolved.symbol) {
            if fragment.text.is_empty() {
                continue;
            }
            match &fragment.symbol {
                Some(symbol) => self.sink.write_symbol(&fragment.text, symbol, resolved.model),
                None => self.sink.write_text(&fragment.text),
            }
        }
        return;
    }

    fn write_path(&mut self, path: &str, line_number: u32) {
        self.sink.write_path(path, line_number);
    }

    fn write_text(&mut self, text: &str) {
        self.sink.write_text(text);
    }
}
