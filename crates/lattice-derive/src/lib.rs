use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro for record shapes the row codec can decode into.
///
/// Generates the `Record` impl: the static member table and the
/// positional decode dispatch. The struct must have named fields and
/// implement `Default`, and every non-skipped member must be a shape
/// the codec supports.
///
/// Generated code refers to the `lattice` facade crate. Crates that
/// depend on `lattice-codec` directly instead set the container
/// attribute `#[lattice(crate = "lattice_codec")]` (any path to a
/// crate re-exporting the codec surface works).
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Track {
///     #[lattice(family = "media", column = "title")]
///     pub title: String,
///
///     #[lattice(rename = "play_count")]
///     pub plays: i64,
///
///     #[lattice(skip)]
///     pub scratch: u32,
/// }
/// ```
///
/// Field attribute keys: `rename = "..."` (the resolved name in rename
/// mode, `"-"` to exclude), `family = "..."` and `column = "..."`
/// (family-column mode, `column = "-"` to exclude), `skip` (never
/// decoded under any mode).
#[proc_macro_derive(Record, attributes(lattice))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.to_string();
    let krate = crate_path(input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record only supports structs",
            ))
        }
    };

    let mut spec_tokens = Vec::new();
    let mut arm_tokens = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.to_string();

        // Parse #[lattice(...)] attribute.
        let mut rename: Option<String> = None;
        let mut family: Option<String> = None;
        let mut column: Option<String> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("lattice") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                } else if meta.path.is_ident("family") {
                    let value: LitStr = meta.value()?.parse()?;
                    family = Some(value.value());
                } else if meta.path.is_ident("column") {
                    let value: LitStr = meta.value()?.parse()?;
                    column = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error(
                        "unknown lattice attribute (expected rename, family, column, or skip)",
                    ));
                }
                Ok(())
            })?;
        }

        if skip && (rename.is_some() || family.is_some() || column.is_some()) {
            return Err(syn::Error::new_spanned(
                field_name,
                "skip cannot be combined with rename, family, or column",
            ));
        }
        if family.is_some() && column.is_none() {
            return Err(syn::Error::new_spanned(
                field_name,
                "family requires a column",
            ));
        }

        let rename_expr = option_str(rename.as_deref());
        let family_expr = option_str(family.as_deref());
        let column_expr = option_str(column.as_deref());

        spec_tokens.push(quote! {
            #krate::FieldSpec {
                name: #field_name_str,
                rename: #rename_expr,
                family: #family_expr,
                column: #column_expr,
                skip: #skip,
            }
        });

        // Skipped members keep their table slot so indices stay
        // positional, but get no dispatch arm.
        if !skip {
            arm_tokens.push(quote! {
                #index => #krate::decode_value(value, ty, &mut self.#field_name),
            });
        }
    }

    let expanded = quote! {
        impl #krate::Record for #name {
            fn record_name() -> &'static str {
                #name_str
            }

            fn field_specs() -> &'static [#krate::FieldSpec] {
                const SPECS: &[#krate::FieldSpec] = &[#(#spec_tokens),*];
                SPECS
            }

            fn decode_field(
                &mut self,
                index: usize,
                value: &#krate::WireValue,
                ty: &#krate::WireType,
            ) -> #krate::Result<()> {
                match index {
                    #(#arm_tokens)*
                    _ => Err(#krate::LatticeError::InvalidFieldIndex {
                        record: #name_str,
                        index,
                    }),
                }
            }
        }
    };

    Ok(expanded.into())
}

/// Container-level `#[lattice(crate = "...")]`, defaulting to the
/// `lattice` facade.
fn crate_path(input: &DeriveInput) -> Result<syn::Path, syn::Error> {
    let mut krate: syn::Path = syn::parse_quote!(::lattice);
    for attr in &input.attrs {
        if !attr.path().is_ident("lattice") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                krate = value.parse()?;
                Ok(())
            } else {
                Err(meta.error("unknown lattice container attribute (expected crate)"))
            }
        })?;
    }
    Ok(krate)
}

fn option_str(value: Option<&str>) -> proc_macro2::TokenStream {
    match value {
        Some(s) => quote! { Some(#s) },
        None => quote! { None },
    }
}
