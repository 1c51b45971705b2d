//! `#[coda_testhelpers::test]`: a `#[test]` that installs the coda test
//! subscriber first.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    struct BeforeFn {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        items: BraceGroup,
    }

    struct TestFn {
        before_fn: BeforeFn, _fn: KFn, name: Ident,
        signature: Signature, body: Body
    }
}

impl quote::ToTokens for BeforeFn {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        tokens.extend(self.items.0.stream())
    }
}

/// Expands to the same function under `#[test]`, with a call to
/// `coda_testhelpers::setup()` as its first statement.
///
/// ```ignore
/// #[coda_testhelpers::test]
/// fn decodes_empty_map() {
///     // reader logs are captured per test
/// }
/// ```
///
/// An argument replaces `#[test]` with that attribute, so
/// `#[coda_testhelpers::test(tokio::test)]` wraps an async test.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let TestFn {
        before_fn,
        _fn,
        name,
        signature,
        body,
    } = match tokens.parse::<TestFn>() {
        Ok(test_fn) => test_fn,
        Err(err) => {
            let message = format!("#[coda_testhelpers::test] expects a function: {err}");
            return quote::quote! { ::core::compile_error!(#message); }.into();
        }
    };

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #test_attr
        #before_fn fn #name #signature {
            ::coda_testhelpers::setup();

            #body
        }
    }
    .into()
}
