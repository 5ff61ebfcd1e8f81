//! Serde attribute reading for declared fields and variants

/// Whether a `#[serde(...)]` attribute carries the bare flag `flag` (e.g. `skip`, `flatten`)
pub fn has_serde_flag(attrs: &[syn::Attribute], flag: &str) -> bool {
    let mut found = false;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(flag)
                && !meta.input.peek(syn::Token![=])
                && !meta.input.peek(syn::token::Paren)
            {
                found = true;
            }
            skip_value(&meta)
        });
    }
    found
}

/// Value of `#[serde(rename = "...")]`, if present
pub fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                let lit: syn::LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
                return Ok(());
            }
            skip_value(&meta)
        });
    }
    rename
}

/// Consume `= value` or `(...)` so the walk can go on to the next entry
fn skip_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_value(&nested))?;
    }
    Ok(())
}
