//! Shared factories for unit tests.
//!
//! Builds small in-memory metadata graphs so decoder and emitter tests do
//! not depend on real compiled modules.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::metadata::{
    members::{Param, ParamAttributes, ParamRc},
    method::{
        LocalVariable, Method, MethodAccessFlags, MethodBody, MethodImplCodeType,
        MethodImplManagement, MethodModifiers, MethodVtableFlags,
    },
    provider::{CilMember, MetadataProvider, SignatureRc, StandAloneSignature},
    token::Token,
    typesystem::{AssemblyName, CilType, CilTypeRc, CilTypeRef, TypeAttributes},
    ConstantValue,
};
use crate::Result;

pub fn corlib() -> Arc<AssemblyName> {
    Arc::new(AssemblyName::new(
        "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ))
}

pub fn test_assembly() -> Arc<AssemblyName> {
    Arc::new(AssemblyName::new(
        "ILDisassembler.Test, Version=1.0.0.0, Culture=neutral",
    ))
}

/// A bare class-shaped type with no members.
pub fn create_type(
    token: u32,
    namespace: &str,
    name: &str,
    assembly: &Arc<AssemblyName>,
) -> CilType {
    CilType {
        token: Token::new(token),
        name: name.to_string(),
        namespace: namespace.to_string(),
        assembly: assembly.clone(),
        flags: TypeAttributes::from_bits_retain(0x0010_0001), // public auto ansi beforefieldinit
        base: None,
        interfaces: Vec::new(),
        element: None,
        rank: 0,
        is_value_type: false,
        is_enum: false,
        underlying: None,
        is_generic_parameter: false,
        generic_args: Vec::new(),
        generic_params: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        properties: Vec::new(),
        events: Vec::new(),
        custom_attributes: Vec::new(),
    }
}

/// A `System.*` primitive from mscorlib.
pub fn primitive(token: u32, name: &str) -> CilTypeRc {
    let mut ty = create_type(token, "System", name, &corlib());
    ty.is_value_type = !matches!(name, "Object" | "String" | "Void");
    Arc::new(ty)
}

pub fn int32() -> CilTypeRc {
    primitive(0x0100_0001, "Int32")
}

pub fn void() -> CilTypeRc {
    primitive(0x0100_0002, "Void")
}

pub struct FixtureMethod {
    pub name: &'static str,
    pub has_body: bool,
    pub code: Option<Vec<u8>>,
    pub locals: usize,
    pub params: Vec<&'static str>,
    pub is_static: bool,
    pub max_stack: u16,
}

impl Default for FixtureMethod {
    fn default() -> Self {
        FixtureMethod {
            name: "Run",
            has_body: true,
            code: Some(vec![0x2A]),
            locals: 0,
            params: Vec::new(),
            is_static: true,
            max_stack: 8,
        }
    }
}

/// A method hanging off a fresh `ILDisassembler.Test.Fixture` type.
pub fn create_method(fixture: FixtureMethod) -> Method {
    let declaring = Arc::new(create_type(
        0x0200_0001,
        "ILDisassembler.Test",
        "Fixture",
        &test_assembly(),
    ));

    let params: Vec<ParamRc> = fixture
        .params
        .iter()
        .enumerate()
        .map(|(position, name)| {
            Arc::new(Param {
                position: position as u16,
                name: (*name).to_string(),
                base: int32(),
                flags: ParamAttributes::empty(),
                default: None,
            })
        })
        .collect();

    let local_vars = (0..fixture.locals)
        .map(|index| {
            Arc::new(LocalVariable {
                index: index as u16,
                base: int32(),
                is_pinned: false,
            })
        })
        .collect();

    let body = fixture.has_body.then(|| MethodBody {
        code: fixture.code,
        max_stack: fixture.max_stack,
        init_locals: fixture.locals > 0,
        local_vars,
        exception_handlers: Vec::new(),
    });

    let mut modifiers = MethodModifiers::HIDE_BY_SIG;
    if fixture.is_static {
        modifiers |= MethodModifiers::STATIC;
    }

    Method {
        token: Token::new(0x0600_0001),
        name: fixture.name.to_string(),
        flags_access: MethodAccessFlags::PUBLIC,
        flags_vtable: MethodVtableFlags::REUSE_SLOT,
        flags_modifiers: modifiers,
        impl_code_type: MethodImplCodeType::IL,
        impl_management: MethodImplManagement::from_impl_flags(0),
        declared_by: CilTypeRef::from(&declaring),
        return_type: void(),
        params,
        generic_params: Vec::new(),
        generic_args: Vec::new(),
        custom_attributes: Vec::new(),
        compiler_generated: false,
        body,
    }
}

pub fn create_param(position: u16, name: &str, base: CilTypeRc) -> ParamRc {
    Arc::new(Param {
        position,
        name: name.to_string(),
        base,
        flags: ParamAttributes::empty(),
        default: None,
    })
}

pub fn create_default_param(
    position: u16,
    name: &str,
    base: CilTypeRc,
    default: ConstantValue,
) -> ParamRc {
    Arc::new(Param {
        position,
        name: name.to_string(),
        base,
        flags: ParamAttributes::OPTIONAL | ParamAttributes::HAS_DEFAULT,
        default: Some(default),
    })
}

/// Token-to-entity maps backing the provider contract in tests.
#[derive(Default)]
pub struct TestProvider {
    pub members: FxHashMap<Token, CilMember>,
    pub strings: FxHashMap<Token, String>,
    pub signatures: FxHashMap<Token, SignatureRc>,
}

impl TestProvider {
    pub fn with_string(mut self, token: u32, value: &str) -> Self {
        self.strings.insert(Token::new(token), value.to_string());
        self
    }

    pub fn with_member(mut self, token: u32, member: CilMember) -> Self {
        self.members.insert(Token::new(token), member);
        self
    }

    pub fn with_signature(mut self, token: u32) -> Self {
        self.signatures.insert(
            Token::new(token),
            Arc::new(StandAloneSignature {
                token: Token::new(token),
            }),
        );
        self
    }
}

impl MetadataProvider for TestProvider {
    fn resolve_member(
        &self,
        token: Token,
        _type_generics: &[CilTypeRc],
        _method_generics: &[CilTypeRc],
    ) -> Result<CilMember> {
        match self.members.get(&token) {
            Some(CilMember::Type(ty)) => Ok(CilMember::Type(ty.clone())),
            Some(CilMember::Method(method)) => Ok(CilMember::Method(method.clone())),
            Some(CilMember::Field(field)) => Ok(CilMember::Field(field.clone())),
            None => Err(crate::Error::TokenResolution(token)),
        }
    }

    fn resolve_string(&self, token: Token) -> Result<String> {
        self.strings
            .get(&token)
            .cloned()
            .ok_or(crate::Error::TokenResolution(token))
    }

    fn resolve_signature(&self, token: Token) -> Result<SignatureRc> {
        self.signatures
            .get(&token)
            .cloned()
            .ok_or(crate::Error::TokenResolution(token))
    }
}

pub fn create_provider() -> TestProvider {
    TestProvider::default()
}
