use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Ident, LitStr, Path, PathArguments, Result, Token};

use route_tree::{build_config, BuildError, InstantiationMode, RouteDescriptor};

/// One declaration: `"/path" (as name)? => (const)? Handler`
struct RouteEntry {
    path: LitStr,
    name: Option<Ident>,
    mode: InstantiationMode,
    handler: Path,
}

struct RoutesInput {
    entries: Punctuated<RouteEntry, Token![,]>,
}

impl Parse for RouteEntry {
    fn parse(input: ParseStream) -> Result<Self> {
        let path: LitStr = input.parse()?;

        // Optional name: "/path" as name
        let name = if input.peek(Token![as]) {
            input.parse::<Token![as]>()?;
            Some(input.call(Ident::parse_any)?)
        } else {
            None
        };

        input.parse::<Token![=>]>()?;

        let mode = if input.peek(Token![const]) {
            input.parse::<Token![const]>()?;
            InstantiationMode::Shared
        } else {
            InstantiationMode::Fresh
        };

        let handler: Path = input.parse()?;

        Ok(Self {
            path,
            name,
            mode,
            handler,
        })
    }
}

impl Parse for RoutesInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let entries = Punctuated::parse_terminated(input)?;
        Ok(Self { entries })
    }
}

// =============================================================================
// Declaration resolution
// =============================================================================

/// `pages::Home` → "pages::Home". Generic arguments and a leading `::` do not
/// name a constructible type.
fn handler_name(handler: &Path) -> Result<String> {
    let invalid = |reason: &str| {
        let source = BuildError::InvalidHandlerSource {
            handler: quote!(#handler).to_string(),
            reason: reason.to_string(),
        };
        syn::Error::new(handler.span(), source)
    };

    if handler.leading_colon.is_some() {
        return Err(invalid("leading `::` is not supported"));
    }
    if handler
        .segments
        .iter()
        .any(|s| !matches!(s.arguments, PathArguments::None))
    {
        return Err(invalid("generic arguments are not supported"));
    }

    Ok(handler
        .segments
        .iter()
        .map(|s| s.ident.unraw().to_string())
        .collect::<Vec<_>>()
        .join("::"))
}

fn to_descriptor(entry: &RouteEntry) -> Result<RouteDescriptor> {
    let handler = handler_name(&entry.handler)?;
    let name = entry.name.as_ref().map(|n| n.unraw().to_string());

    RouteDescriptor::new(&entry.path.value(), name.as_deref(), handler, entry.mode)
        .map_err(|e| syn::Error::new(entry.path.span(), e))
}

/// Span of the declaration a build error is about.
///
/// Duplicates point at the later declaration, the one that clashes.
fn error_span(input: &RoutesInput, err: &BuildError) -> Span {
    let by_path = |path: &str| {
        input
            .entries
            .iter()
            .rev()
            .find(|e| e.path.value() == path)
            .map(|e| e.path.span())
    };

    let span = match err {
        BuildError::DuplicateName { name, path } => input
            .entries
            .iter()
            .rev()
            .find(|e| {
                e.path.value() == *path
                    && e.name.as_ref().is_some_and(|n| n.unraw() == name.as_str())
            })
            .and_then(|e| e.name.as_ref().map(|n| n.span()))
            .or_else(|| by_path(path.as_str())),
        _ => err.path().and_then(by_path),
    };
    span.unwrap_or_else(Span::call_site)
}

// =============================================================================
// Code generation
// =============================================================================

fn expand(input: RoutesInput) -> Result<TokenStream2> {
    let descriptors = input
        .entries
        .iter()
        .map(to_descriptor)
        .collect::<Result<Vec<_>>>()?;

    let config =
        build_config(descriptors).map_err(|e| syn::Error::new(error_span(&input, &e), e))?;

    let lit = LitStr::new(&config, Span::call_site());
    Ok(quote! { #lit })
}

// =============================================================================
// Entry point
// =============================================================================

/// Render a routing configuration at compile time.
///
/// Expands to a `&'static str` literal. Each declaration is a path, an
/// optional name, and a handler; `const` selects a shared instance.
///
/// ```ignore
/// const ROUTES: &str = route_tree_macro::routes! {
///     "/" => const Shell,
///     "/home" => const Home,
///     "/home/settings" as settings => Settings,
/// };
/// ```
///
/// Duplicate paths or names, unparsable paths and declarations without a
/// top-level anchor are reported as compile errors on the offending
/// declaration. Nested routes with no declared ancestor are left out.
#[proc_macro]
pub fn routes(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as RoutesInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
