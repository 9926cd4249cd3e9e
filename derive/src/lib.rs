use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod decode;

#[proc_macro_derive(Decode, attributes(reserved))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match decode::expand_decode(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
