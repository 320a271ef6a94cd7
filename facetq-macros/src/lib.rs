use convert_case::{Case, Casing};
use darling::util::Flag;
use darling::FromVariant;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use std::collections::HashSet;
use syn::{parse_macro_input, Data, DataEnum, DeriveInput, Fields};

/// Derive `facetq::Code` for an enum of unit variants.
///
/// Each variant maps to a stable, URL safe code. By default this is the kebab-case variant name,
/// `#[code(rename = "...")]` overrides it. Marking one variant with `#[code(default)]` also
/// derives `Default`.
#[proc_macro_derive(Code, attributes(code))]
pub fn derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let DeriveInput {
        ident,
        data,
        generics: _,
        ..
    } = parse_macro_input!(input as DeriveInput);

    let data = match data {
        Data::Enum(data) => data,
        _ => panic!("Derive can only be used on enum types"),
    };

    let info = collect(&data);

    let expanded_code = expand_code(&ident, &info);
    let expanded_default = expand_default(&ident, &info);

    let expanded = quote! {
        #expanded_code

        #expanded_default
    };

    proc_macro::TokenStream::from(expanded)
}

fn expand_code(ident: &Ident, info: &Info) -> TokenStream {
    let variants = info.variants.iter().map(|variant| {
        let ident = &variant.ident;
        quote! { Self::#ident }
    });

    let to_code = info.variants.iter().map(|variant| {
        let ident = &variant.ident;
        let code = &variant.code;
        quote! {
            Self::#ident => #code
        }
    });

    let from_code = info.variants.iter().map(|variant| {
        let ident = &variant.ident;
        let code = &variant.code;
        quote! {
            #code => Some(Self::#ident)
        }
    });

    quote! {
        impl facetq::Code for #ident {
            const VARIANTS: &'static [Self] = &[ #(#variants, )* ];

            fn code(&self) -> &'static str {
                match self {
                    #(#to_code, )*
                }
            }

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    #(#from_code, )*
                    _ => None,
                }
            }
        }
    }
}

fn expand_default(ident: &Ident, info: &Info) -> TokenStream {
    match &info.default {
        Some(default) => quote! {
            impl Default for #ident {
                fn default() -> Self {
                    Self::#default
                }
            }
        },
        None => quote! {},
    }
}

struct Info {
    variants: Vec<Variant>,
    default: Option<Ident>,
}

struct Variant {
    ident: Ident,
    code: String,
}

#[derive(FromVariant, Default)]
#[darling(default, attributes(code))]
struct VariantOpts {
    rename: Option<String>,
    default: Flag,
}

fn collect(data: &DataEnum) -> Info {
    let mut variants = vec![];
    let mut default = None;
    let mut seen = HashSet::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            panic!("Variant must not have any fields");
        }

        let opts = VariantOpts::from_variant(variant).expect("Unable to parse variant options");

        let code = match opts.rename {
            Some(code) => code,
            None => variant.ident.to_string().to_case(Case::Kebab),
        };

        if code.is_empty() {
            panic!("Code of variant {} must not be empty", variant.ident);
        }
        if !seen.insert(code.clone()) {
            panic!("Duplicate code: {code}");
        }

        if opts.default.is_present() {
            if default.is_some() {
                panic!("Only one variant can be the default");
            }
            default = Some(variant.ident.clone());
        }

        variants.push(Variant {
            ident: variant.ident.clone(),
            code,
        });
    }

    Info { variants, default }
}
