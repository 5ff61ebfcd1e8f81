/// Arguments of a `#[route(...)]` attribute: an optional method identifier and `path = "..."`
#[derive(Debug, Default)]
pub struct RouteArgs {
    /// Method as written; validated against the supported set by the caller
    pub method: Option<String>,
    pub path: Option<syn::LitStr>,
}

impl syn::parse::Parse for RouteArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut args = RouteArgs::default();

        while !input.is_empty() {
            let lookahead = input.lookahead1();
            if !lookahead.peek(syn::Ident) {
                return Err(lookahead.error());
            }

            let ident: syn::Ident = input.parse()?;
            if ident == "path" {
                input.parse::<syn::Token![=]>()?;
                args.path = Some(input.parse()?);
            } else if args.method.is_none() {
                args.method = Some(ident.to_string().to_lowercase());
            } else {
                return Err(syn::Error::new(ident.span(), "duplicate route method"));
            }

            if input.peek(syn::Token![,]) {
                input.parse::<syn::Token![,]>()?;
            } else {
                break;
            }
        }

        if !input.is_empty() {
            return Err(input.error("unexpected tokens in route arguments"));
        }
        Ok(args)
    }
}
