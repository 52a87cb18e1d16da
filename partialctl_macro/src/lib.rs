// PartialCTL: Checking CTL Properties on Partially Explored State Spaces
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # CTL Macro
//!
//! This crate provides the `ctl!` macro, to write CTL formulas ([`partialctl::Formula`]) using
//! Rust tokens.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, BinOp, Error, Expr, ExprBinary, ExprCall, ExprLit, ExprParen, ExprPath,
    ExprUnary, Lit, Result, UnOp,
};

/// # Generate CTL Formulas from the provided tokens
///
/// The result is a `partialctl::Formula`.
///
/// ## Allowed Tokens
/// - `true`, `false`: `Formula::True` and `Formula::False`
/// - Identifiers and string literals: `Formula::AtomicProposition`
/// - `!`, `-`: `Formula::Not`
/// - `+`, `||`, `|`: `Formula::Or`
/// - `*`, `&&`, `&`: `Formula::And`
/// - `==`: `Formula::Iff`
/// - `>>`, `>`: `Formula::Implies`
/// - `<<`, `<`, `<=`: `Formula::Implies`, but in reverse
/// - `Not(_)`, `not(_)`: `Formula::Not`
/// - `And(_, ..)`, `and(_, ..)`: `Formula::And`, nested to the left
/// - `Or(_, ..)`, `or(_, ..)`: `Formula::Or`, nested to the left
/// - `Implies(_, _)`, `implies(_, _)`: `Formula::Implies`
/// - `Iff(_, _)`, `iff(_, _)`: `Formula::Iff`
/// - `EX(_)`, `ex(_)`: `Formula::ExistsNext`
/// - `AX(_)`, `ax(_)`: `Formula::ForAllNext`
/// - `EG(_)`, `eg(_)`: `Formula::ExistsAlways`
/// - `AG(_)`, `ag(_)`: `Formula::ForAllAlways`
/// - `EF(_)`, `ef(_)`: `Formula::ExistsEventually`
/// - `AF(_)`, `af(_)`: `Formula::ForAllEventually`
/// - `EU(_, _)`, `eu(_, _)`: `Formula::ExistsUntil`
/// - `AU(_, _)`, `au(_, _)`: `Formula::ForAllUntil`
#[proc_macro]
pub fn ctl(input: TokenStream) -> TokenStream {
    let e = parse_macro_input!(input as Expr);

    match parse_recursive(e) {
        Ok(result) => TokenStream::from(result),
        Err(e) => e.to_compile_error().into(),
    }
}

fn parse_recursive(e: Expr) -> Result<TokenStream2> {
    match e {
        Expr::Lit(ExprLit { lit: Lit::Bool(b), .. }) => {
            if b.value {
                Ok(quote! {::partialctl::Formula::True})
            } else {
                Ok(quote! {::partialctl::Formula::False})
            }
        }
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => {
            Ok(quote! {::partialctl::Formula::atomic(#s)})
        }
        Expr::Path(ExprPath { path, .. }) => match path.get_ident() {
            Some(ident) => {
                let name = ident.to_string();
                Ok(quote! {::partialctl::Formula::atomic(#name)})
            }
            None => Err(Error::new_spanned(path.clone(), "Invalid atomic proposition")),
        },
        Expr::Unary(ExprUnary { op: UnOp::Neg(_), expr, .. })
        | Expr::Unary(ExprUnary { op: UnOp::Not(_), expr, .. }) => {
            let content = parse_recursive(*expr)?;
            Ok(quote! {::partialctl::Formula::not(#content)})
        }
        Expr::Binary(ExprBinary { op, left, right, attrs }) => {
            let l = parse_recursive(*left.clone())?;
            let r = parse_recursive(*right.clone())?;
            match op {
                BinOp::Add(_) | BinOp::Or(_) | BinOp::BitOr(_) => {
                    Ok(quote! {::partialctl::Formula::or(#l, #r)})
                }
                BinOp::Mul(_) | BinOp::And(_) | BinOp::BitAnd(_) => {
                    Ok(quote! {::partialctl::Formula::and(#l, #r)})
                }
                BinOp::Eq(_) => Ok(quote! {::partialctl::Formula::iff(#l, #r)}),
                BinOp::Shr(_) | BinOp::Gt(_) => {
                    Ok(quote! {::partialctl::Formula::implies(#l, #r)})
                }
                BinOp::Shl(_) | BinOp::Lt(_) | BinOp::Le(_) => {
                    Ok(quote! {::partialctl::Formula::implies(#r, #l)})
                }
                _ => Err(Error::new_spanned(
                    ExprBinary { attrs, left, op, right },
                    format!("Unknown binary operator: {:?}", op),
                )),
            }
        }
        Expr::Paren(ExprParen { expr, .. }) => parse_recursive(*expr),
        Expr::Call(ExprCall { func, args, .. }) => {
            // check the function name
            let func_ident = if let Expr::Path(ExprPath { path, .. }) = *func.clone() {
                if let Some(ident) = path.get_ident() {
                    ident.to_string()
                } else {
                    return Err(Error::new_spanned(
                        path.clone(),
                        format!("Invalid function: {:?}", path),
                    ));
                }
            } else {
                return Err(Error::new_spanned(
                    func.clone(),
                    format!("Invalid function: {:?}", func),
                ));
            };
            let args = args
                .iter()
                .map(|e| parse_recursive(e.clone()))
                .collect::<Result<Vec<_>>>()?;

            let unary = |name: &str, constructor: TokenStream2| -> Result<TokenStream2> {
                match args.as_slice() {
                    [a] => Ok(quote! {::partialctl::Formula::#constructor(#a)}),
                    _ => Err(Error::new_spanned(
                        func.clone(),
                        format!("Invalid number of arguments for \"{}\"", name),
                    )),
                }
            };
            let binary = |name: &str, constructor: TokenStream2| -> Result<TokenStream2> {
                match args.as_slice() {
                    [a, b] => Ok(quote! {::partialctl::Formula::#constructor(#a, #b)}),
                    _ => Err(Error::new_spanned(
                        func.clone(),
                        format!("Invalid number of arguments for \"{}\"", name),
                    )),
                }
            };
            let nary = |name: &str, constructor: TokenStream2| -> Result<TokenStream2> {
                let mut iter = args.iter();
                match iter.next() {
                    Some(first) => Ok(iter.fold(first.clone(), |acc, x| {
                        quote! {::partialctl::Formula::#constructor(#acc, #x)}
                    })),
                    None => Err(Error::new_spanned(
                        func.clone(),
                        format!("Invalid number of arguments for \"{}\"", name),
                    )),
                }
            };

            match func_ident.as_str() {
                "Not" | "not" => unary("Not", quote! {not}),
                "And" | "and" => nary("And", quote! {and}),
                "Or" | "or" => nary("Or", quote! {or}),
                "Implies" | "implies" => binary("Implies", quote! {implies}),
                "Iff" | "iff" => binary("Iff", quote! {iff}),
                "EX" | "ex" => unary("EX", quote! {exists_next}),
                "AX" | "ax" => unary("AX", quote! {for_all_next}),
                "EG" | "eg" => unary("EG", quote! {exists_always}),
                "AG" | "ag" => unary("AG", quote! {for_all_always}),
                "EF" | "ef" => unary("EF", quote! {exists_eventually}),
                "AF" | "af" => unary("AF", quote! {for_all_eventually}),
                "EU" | "eu" => binary("EU", quote! {exists_until}),
                "AU" | "au" => binary("AU", quote! {for_all_until}),
                _ => Err(Error::new_spanned(
                    func.clone(),
                    format!("Invalid function name: {}", func_ident),
                )),
            }
        }
        e => Err(Error::new_spanned(e.clone(), format!("Invalid expression: {:?}", e))),
    }
}
