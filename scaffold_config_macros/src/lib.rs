extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Expr, Fields, Lit, MetaNameValue, parse_macro_input, punctuated::Punctuated,
    token,
};

/// Derives `FromConfiguration` for a struct with named fields.
///
/// Every field becomes one setting. The setting name defaults to the field
/// name and can be set with `#[setting(name = "git.name")]`; the field type
/// must implement `SettingValue`.
#[proc_macro_derive(ScaffoldConfig, attributes(setting))]
pub fn scaffold_config_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Only structs with named fields are supported",
                ));
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Only structs are supported")),
    };

    let mut idents = Vec::with_capacity(fields.len());
    let mut setting_names = Vec::with_capacity(fields.len());
    let mut types = Vec::with_capacity(fields.len());

    for f in fields {
        let Some(ident) = f.ident.as_ref() else {
            return Err(syn::Error::new_spanned(f, "Expected a named field"));
        };
        let mut setting_name = ident.to_string();

        for attr in &f.attrs {
            if !attr.path().is_ident("setting") {
                continue;
            }
            let parsed_attrs = attr
                .parse_args_with(Punctuated::<MetaNameValue, token::Comma>::parse_terminated)?;

            for nv in parsed_attrs {
                if nv.path.is_ident("name") {
                    setting_name = get_string_lit_from_expr(&nv.value)?;
                } else {
                    return Err(syn::Error::new_spanned(&nv.path, "Unknown setting attribute"));
                }
            }
        }

        idents.push(ident);
        setting_names.push(setting_name);
        types.push(&f.ty);
    }

    Ok(quote! {
        impl ::scaffold_config::FromConfiguration for #name {
            fn settings_schema() -> ::core::result::Result<
                &'static ::scaffold_config::SettingsSchema,
                ::scaffold_config::ConfigError,
            > {
                static SCHEMA: ::scaffold_config::__private::OnceCell<::scaffold_config::SettingsSchema> =
                    ::scaffold_config::__private::OnceCell::new();
                SCHEMA.get_or_try_init(|| {
                    let mut builder = ::scaffold_config::SettingsSchema::builder();
                    #(
                        builder.define(
                            #setting_names,
                            <#types as ::scaffold_config::SettingValue>::type_token(),
                        );
                    )*
                    builder.build()
                })
            }

            fn from_configuration(
                config: &::scaffold_config::Configuration,
            ) -> ::core::result::Result<Self, ::scaffold_config::ConfigError> {
                ::core::result::Result::Ok(Self {
                    #(
                        #idents: <#types as ::scaffold_config::SettingValue>::from_setting(
                            #setting_names,
                            config.get_setting(#setting_names)?,
                        )?,
                    )*
                })
            }
        }
    })
}

// --- Helper Functions for Attribute Parsing ---

/// Extracts a `String` from a string literal expression (e.g., `"git.name"`).
/// Returns a `syn::Error` if the expression is not a string literal.
fn get_string_lit_from_expr(expr: &Expr) -> syn::Result<String> {
    if let Expr::Lit(expr_lit) = expr
        && let Lit::Str(lit_str) = &expr_lit.lit
    {
        return Ok(lit_str.value());
    }
    Err(syn::Error::new_spanned(expr, "Expected a string literal"))
}
