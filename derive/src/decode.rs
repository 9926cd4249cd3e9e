use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitInt, Result, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_decode(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`Decode` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`Decode` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let reads = fields.iter().map(|field| {
        let FieldMetadata { name, ty, reserved } = field;

        let skip = reserved.as_ref().map(|n| {
            quote! { __cursor.skip(#n)?; }
        });

        quote! {
            let #name = <#ty as ::cassette::sans::Decode>::decode(__cursor)?;
            #skip
        }
    });

    let names = fields.iter().map(|field| &field.name);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::cassette::sans::Decode for #name #ty_generics #where_clause {
            fn decode(
                __cursor: &mut ::cassette::sans::cursor::Cursor<'_>,
            ) -> ::core::result::Result<Self, ::cassette::sans::error::DecodeError> {
                #(#reads)*
                ::core::result::Result::Ok(Self { #(#names),* })
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    reserved: Option<LitInt>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new(field.span(), "Field must be named."))?
        };

        let reserved = match field.attrs.iter().find(|a| a.path().is_ident("reserved")) {
            Some(attr) => {
                let ReservedAttribute { count } = attr.meta.require_list()?.parse_args()?;
                Some(count)
            }
            None => None,
        };

        Ok(Self {
            name,
            ty: field.ty.clone(),
            reserved,
        })
    }
}

#[derive(Debug)]
struct ReservedAttribute {
    count: LitInt,
}

impl Parse for ReservedAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let count = input.parse::<LitInt>()?;
        if count.base10_parse::<usize>()? == 0 {
            Err(Error::new(count.span(), "Reserved byte count must be nonzero."))?;
        }
        Ok(Self { count })
    }
}
