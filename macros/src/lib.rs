//  LIB.rs
//    by Lut99
//
//  Created:
//    21 Mar 2025, 09:40:12
//  Last edited:
//    21 Mar 2025, 13:55:37
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the `dfa!{}`-macro for the `myhill`-crate.
//

// Modules
mod dfa;

// Imports
use proc_macro::TokenStream;
use syn::parse::Parser as _;


/***** LIBRARY *****/
/// Writes an automaton in a small embedded DSL.
///
/// ```ignore
/// let dfa = dfa! {
///     alphabet: [a, b];
///
///     start q0 @ (100, 200) { a => q1, b => q0 }
///     q1 { a => q2, b => none }
///     final q2 { a => q2, b => q2 }
/// };
/// ```
///
/// Roles are given by prefixing `start`, `final` or `start final`. The target `none` means the
/// transition is absent. Symbols and states may also be given as string or integer literals.
///
/// By default, the macro refers to the library as `::myhill`. Override this with
/// `#![crate_path(...)]` as the first thing in the macro.
#[proc_macro]
pub fn dfa(input: TokenStream) -> TokenStream {
    match dfa::dfa.parse2(input.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
