//! Shared in-memory metadata fixture for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use cildasm::prelude::*;

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

/// A bare public class with `auto ansi beforefieldinit` defaults.
pub fn class(token: u32, namespace: &str, name: &str, assembly: &Arc<AssemblyName>) -> CilType {
    CilType {
        token: Token::new(token),
        name: name.to_string(),
        namespace: namespace.to_string(),
        assembly: assembly.clone(),
        flags: TypeAttributes::from_bits_retain(0x0010_0001),
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

pub fn interface(token: u32, namespace: &str, name: &str, assembly: &Arc<AssemblyName>) -> CilType {
    let mut ty = class(token, namespace, name, assembly);
    ty.flags = TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT | TypeAttributes::PUBLIC;
    ty
}

pub fn primitive(token: u32, name: &str) -> CilTypeRc {
    let mut ty = class(token, "System", name, &corlib());
    ty.is_value_type = !matches!(name, "Object" | "String" | "Void");
    Arc::new(ty)
}

pub fn void() -> CilTypeRc {
    primitive(0x0100_0001, "Void")
}

pub fn int32() -> CilTypeRc {
    primitive(0x0100_0002, "Int32")
}

pub fn string_type() -> CilTypeRc {
    primitive(0x0100_0003, "String")
}

pub fn object_type() -> CilTypeRc {
    primitive(0x0100_0004, "Object")
}

pub fn param(position: u16, name: &str, base: CilTypeRc) -> ParamRc {
    Arc::new(Param {
        position,
        name: name.to_string(),
        base,
        flags: ParamAttributes::empty(),
        default: None,
    })
}

/// A public IL method attached to `declaring`.
pub fn method(
    declaring: &CilTypeRc,
    name: &str,
    is_static: bool,
    return_type: CilTypeRc,
    params: Vec<ParamRc>,
    code: Option<Vec<u8>>,
) -> Method {
    method_with_ref(
        CilTypeRef::from(declaring),
        name,
        is_static,
        return_type,
        params,
        code,
    )
}

/// Like [`method`], but usable inside `Arc::new_cyclic` while the declaring
/// type is still under construction.
pub fn method_with_ref(
    declared_by: CilTypeRef,
    name: &str,
    is_static: bool,
    return_type: CilTypeRc,
    params: Vec<ParamRc>,
    code: Option<Vec<u8>>,
) -> Method {
    let mut modifiers = MethodModifiers::HIDE_BY_SIG;
    if is_static {
        modifiers |= MethodModifiers::STATIC;
    }

    Method {
        token: Token::new(0x0600_0100),
        name: name.to_string(),
        flags_access: MethodAccessFlags::PUBLIC,
        flags_vtable: MethodVtableFlags::REUSE_SLOT,
        flags_modifiers: modifiers,
        impl_code_type: MethodImplCodeType::IL,
        impl_management: MethodImplManagement::from_impl_flags(0),
        declared_by,
        return_type,
        params,
        generic_params: Vec::new(),
        generic_args: Vec::new(),
        custom_attributes: Vec::new(),
        compiler_generated: false,
        body: code.map(|code| MethodBody {
            code: Some(code),
            max_stack: 8,
            init_locals: false,
            local_vars: Vec::new(),
            exception_handlers: Vec::new(),
        }),
    }
}

#[derive(Default)]
pub struct TestProvider {
    members: HashMap<u32, CilMember>,
    strings: HashMap<u32, String>,
    signatures: HashMap<u32, SignatureRc>,
}

impl TestProvider {
    pub fn new() -> Self {
        TestProvider::default()
    }

    pub fn with_string(mut self, token: u32, value: &str) -> Self {
        self.strings.insert(token, value.to_string());
        self
    }

    pub fn with_method(mut self, token: u32, method: MethodRc) -> Self {
        self.members.insert(token, CilMember::Method(method));
        self
    }

    pub fn with_field(mut self, token: u32, field: FieldRc) -> Self {
        self.members.insert(token, CilMember::Field(field));
        self
    }

    pub fn with_type(mut self, token: u32, ty: CilTypeRc) -> Self {
        self.members.insert(token, CilMember::Type(ty));
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
        match self.members.get(&token.value()) {
            Some(CilMember::Type(ty)) => Ok(CilMember::Type(ty.clone())),
            Some(CilMember::Method(method)) => Ok(CilMember::Method(method.clone())),
            Some(CilMember::Field(field)) => Ok(CilMember::Field(field.clone())),
            None => Err(Error::TokenResolution(token)),
        }
    }

    fn resolve_string(&self, token: Token) -> Result<String> {
        self.strings
            .get(&token.value())
            .cloned()
            .ok_or(Error::TokenResolution(token))
    }

    fn resolve_signature(&self, token: Token) -> Result<SignatureRc> {
        self.signatures
            .get(&token.value())
            .cloned()
            .ok_or(Error::TokenResolution(token))
    }
}
