//  DFA.rs
//    by Lut99
//
//  Created:
//    21 Mar 2025, 09:41:55
//  Last edited:
//    21 Mar 2025, 13:55:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`dfa!()`]-macro.
//

use std::collections::HashSet;

use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote, quote_spanned};
use syn::ext::IdentExt as _;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned as _;
use syn::token::{Brace, Comma};
use syn::{Attribute, Error, Expr, Ident, LitInt, LitStr, Path, Token, braced, bracketed, parenthesized, parse_quote};


/***** AST *****/
/// The attributes given to the macro as a whole.
struct DfaAttributes {
    /// The path to the `myhill`-crate.
    crate_path: Path,
}
impl Parse for DfaAttributes {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut crate_path: Path = parse_quote!(::myhill);
        for attr in input.call(Attribute::parse_inner)? {
            if attr.path().is_ident("crate_path") {
                crate_path = attr.parse_args()?;
            } else {
                return Err(Error::new(attr.span(), format!("Unknown attribute '{}'", attr.path().to_token_stream())));
            }
        }
        Ok(Self { crate_path })
    }
}



/// The name of a symbol or a state.
///
/// May be written as an identifier, a string literal or an integer literal.
struct Name {
    /// The name itself.
    value: String,
    /// Where it was written.
    span:  Span,
}
impl Parse for Name {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(Ident) {
            let ident: Ident = input.parse()?;
            Ok(Self { value: ident.unraw().to_string(), span: ident.span() })
        } else if lookahead.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            Ok(Self { value: lit.value(), span: lit.span() })
        } else if lookahead.peek(LitInt) {
            let lit: LitInt = input.parse()?;
            Ok(Self { value: lit.base10_digits().into(), span: lit.span() })
        } else {
            Err(lookahead.error())
        }
    }
}
impl ToTokens for Name {
    #[inline]
    fn to_tokens(&self, tokens: &mut TokenStream2) { LitStr::new(&self.value, self.span).to_tokens(tokens) }
}



/// The destination of a transition.
enum TargetDef {
    /// Written as `none`.
    None(Span),
    /// Any other name.
    State(Name),
}
impl Parse for TargetDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        // Only the bare identifier means absent; `"none"` names a state
        if input.cursor().ident().is_some_and(|(ident, _)| ident == "none") {
            let ident: Ident = input.parse()?;
            return Ok(Self::None(ident.span()));
        }
        Ok(Self::State(input.parse()?))
    }
}

/// A transition, `symbol => target`.
struct TransitionDef {
    symbol: Name,
    target: TargetDef,
}
impl Parse for TransitionDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let symbol: Name = input.parse()?;
        input.parse::<Token![=>]>()?;
        let target: TargetDef = input.parse()?;
        Ok(Self { symbol, target })
    }
}

/// A state, `[start] [final] id [@ (x, y)] { transitions }`.
struct StateDef {
    is_start:    bool,
    is_final:    bool,
    id:          Name,
    position:    Option<(Expr, Expr)>,
    transitions: Punctuated<TransitionDef, Comma>,
}
impl Parse for StateDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        // A leading `start` is a role unless it's the name of the state itself
        let is_start: bool = match input.cursor().ident() {
            Some((ident, _)) if ident == "start" && !input.peek2(Brace) && !input.peek2(Token![@]) => {
                input.parse::<Ident>()?;
                true
            },
            _ => false,
        };
        let is_final: bool = input.parse::<Option<Token![final]>>()?.is_some();
        let id: Name = input.parse()?;

        let position: Option<(Expr, Expr)> = if input.peek(Token![@]) {
            input.parse::<Token![@]>()?;
            let content;
            parenthesized!(content in input);
            let x: Expr = content.parse()?;
            content.parse::<Token![,]>()?;
            let y: Expr = content.parse()?;
            Some((x, y))
        } else {
            None
        };

        let content;
        braced!(content in input);
        let transitions = Punctuated::<TransitionDef, Comma>::parse_terminated(&content)?;
        Ok(Self { is_start, is_final, id, position, transitions })
    }
}





/***** LIBRARY *****/
/// Implements the `dfa!()`-macro.
///
/// # Arguments
/// - `input`: The input tokens to parse, as a [`ParseStream`].
///
/// # Returns
/// A [`TokenStream2`] that builds the automaton.
///
/// # Errors
/// This function errors if the input is not a valid automaton. Next to syntax errors, this happens
/// when states are defined twice, when a state has two transitions on the same symbol or when a
/// transition uses a symbol outside of the alphabet.
pub fn dfa(input: ParseStream) -> Result<TokenStream2, Error> {
    let attrs: DfaAttributes = input.parse()?;
    let crate_path: &Path = &attrs.crate_path;

    // The alphabet comes first
    let header: Ident = input.parse()?;
    if header != "alphabet" {
        return Err(Error::new(header.span(), "Expected 'alphabet' before any states"));
    }
    input.parse::<Token![:]>()?;
    let content;
    bracketed!(content in input);
    let alphabet = Punctuated::<Name, Comma>::parse_terminated(&content)?;
    input.parse::<Token![;]>()?;
    let symbols: HashSet<&str> = alphabet.iter().map(|s| s.value.as_str()).collect();

    // Then the states
    let mut ids: HashSet<String> = HashSet::new();
    let mut states: Vec<TokenStream2> = Vec::new();
    while !input.is_empty() {
        let state: StateDef = input.parse()?;
        if !ids.insert(state.id.value.clone()) {
            return Err(Error::new(state.id.span, format!("State '{}' is defined more than once", state.id.value)));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut transitions: Vec<TokenStream2> = Vec::with_capacity(state.transitions.len());
        for trans in &state.transitions {
            if !symbols.contains(trans.symbol.value.as_str()) {
                return Err(Error::new(trans.symbol.span, format!("Symbol '{}' is not in the alphabet", trans.symbol.value)));
            }
            if !seen.insert(trans.symbol.value.as_str()) {
                return Err(Error::new(
                    trans.symbol.span,
                    format!("State '{}' has more than one transition on '{}'", state.id.value, trans.symbol.value),
                ));
            }

            let symbol: &Name = &trans.symbol;
            transitions.push(match &trans.target {
                TargetDef::None(span) => quote_spanned! { *span => .with_transition(#symbol, #crate_path::automaton::Target::None) },
                TargetDef::State(name) => quote_spanned! { name.span => .with_transition(#symbol, #crate_path::automaton::Target::state(#name)) },
            });
        }

        let role: Ident = Ident::new(
            match (state.is_start, state.is_final) {
                (true, true) => "StartFinal",
                (true, false) => "Start",
                (false, true) => "Final",
                (false, false) => "Plain",
            },
            state.id.span,
        );
        let position: Option<TokenStream2> = state.position.as_ref().map(|(x, y)| quote! { .with_position((#x) as f64, (#y) as f64) });
        let id: &Name = &state.id;
        states.push(quote_spanned! {
            id.span =>
            .with_state(#id, #crate_path::automaton::State::new(#crate_path::automaton::Role::#role) #(#transitions)* #position)
        });
    }

    let alphabet_items = alphabet.iter();
    Ok(quote! {
        #crate_path::automaton::Automaton::new::<&'static str>([#(#alphabet_items),*])
            #(#states)*
    })
}
