use core::any::{Any, TypeId};

use coda_json::{
    CodableType, CodecProvider, CodingContext, Decoder, DecoderCodec, EmptyContext, Encoder,
    EncoderCodec, JsonErrorKind, Registry, Result, codable_scalar, from_str_with_registry,
    to_string_with_registry, upcast_self,
};
use coda_testhelpers::test;

struct Tenant {
    prefix: &'static str,
}

impl CodingContext for Tenant {}

/// A request context that also is a [`Tenant`].
struct Request {
    tenant: Tenant,
    locale: &'static str,
}

impl CodingContext for Request {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        upcast_self(self, target).or_else(|| self.tenant.upcast(target))
    }
}

#[derive(Debug, PartialEq)]
struct AccountId(String);
codable_scalar!(AccountId => "AccountId");

/// Account ids are stored without the tenant prefix and shown with it.
struct TenantAccountCodec;

impl DecoderCodec for TenantAccountCodec {
    type Value = AccountId;
    type Context = Tenant;

    fn decode(&self, _: &CodableType, d: &mut Decoder<'_>, tenant: &Tenant) -> Result<AccountId> {
        let raw = d.read_string()?;
        Ok(AccountId(raw.trim_start_matches(tenant.prefix).to_string()))
    }
}

impl EncoderCodec for TenantAccountCodec {
    type Value = AccountId;
    type Context = Tenant;

    fn encode(
        &self,
        _: &CodableType,
        v: &AccountId,
        e: &mut Encoder<'_>,
        tenant: &Tenant,
    ) -> Result<()> {
        e.write_string(&format!("{}{}", tenant.prefix, v.0))
    }
}

/// The context-free fallback: ids as they are.
struct PlainAccountCodec;

impl DecoderCodec for PlainAccountCodec {
    type Value = AccountId;
    type Context = EmptyContext;

    fn decode(&self, _: &CodableType, d: &mut Decoder<'_>, _: &EmptyContext) -> Result<AccountId> {
        d.read_string().map(AccountId)
    }
}

fn registry() -> Registry {
    Registry::builder()
        .provider(
            CodecProvider::new()
                .with_codec(TenantAccountCodec)
                .with_decoder(PlainAccountCodec),
        )
        .build()
}

#[test]
fn codecs_only_run_under_their_context() {
    let registry = registry();
    let tenant = Tenant { prefix: "acme-" };

    let id: AccountId = from_str_with_registry(r#""acme-42""#, &registry, &tenant).unwrap();
    assert_eq!(id, AccountId("42".into()));

    // without a tenant the next binding for the same identity is chosen
    let id: AccountId = from_str_with_registry(r#""acme-42""#, &registry, &EmptyContext).unwrap();
    assert_eq!(id, AccountId("acme-42".into()));
}

#[test]
fn embedded_contexts_satisfy_codecs() {
    let registry = registry();
    let request = Request {
        tenant: Tenant { prefix: "t1/" },
        locale: "fr",
    };
    assert_eq!(request.locale, "fr");

    let ids: Vec<AccountId> =
        from_str_with_registry(r#"["t1/a", "t1/b"]"#, &registry, &request).unwrap();
    assert_eq!(ids, [AccountId("a".into()), AccountId("b".into())]);

    let out = to_string_with_registry(&ids, &registry, &request).unwrap();
    assert_eq!(out, r#"["t1/a","t1/b"]"#);
}

#[test]
fn missing_context_is_a_resolution_failure() {
    let registry = registry();
    let err =
        to_string_with_registry(&AccountId("1".into()), &registry, &EmptyContext).unwrap_err();
    assert!(matches!(
        err.kind,
        JsonErrorKind::NoCodecRegistered {
            ref type_name,
            context: "EmptyContext",
            capability: "encoder",
        } if type_name == "AccountId"
    ));

    struct Elsewhere;
    impl CodingContext for Elsewhere {}

    let err = to_string_with_registry(&AccountId("1".into()), &registry, &Elsewhere).unwrap_err();
    match err.kind {
        JsonErrorKind::NoCodecRegistered { context, .. } => assert!(context.ends_with("Elsewhere")),
        other => panic!("unexpected error: {other}"),
    }
}

/// Looks up a tenant itself instead of declaring one.
struct Snooping;

impl DecoderCodec for Snooping {
    type Value = AccountId;
    type Context = EmptyContext;

    fn decode(&self, _: &CodableType, d: &mut Decoder<'_>, _: &EmptyContext) -> Result<AccountId> {
        let tenant = d.context::<Tenant>()?;
        let raw = d.read_string()?;
        Ok(AccountId(format!("{}{raw}", tenant.prefix)))
    }
}

#[test]
fn asking_for_an_absent_context() {
    let registry = Registry::builder()
        .provider(CodecProvider::new().with_decoder(Snooping))
        .build();

    let id: AccountId =
        from_str_with_registry(r#""7""#, &registry, &Tenant { prefix: "x:" }).unwrap();
    assert_eq!(id, AccountId("x:7".into()));

    let err = from_str_with_registry::<AccountId>(r#""7""#, &registry, &EmptyContext).unwrap_err();
    assert_eq!(err.kind.code(), "json::context_unavailable");
    assert!(err.to_string().starts_with("context EmptyContext does not provide"));
}
