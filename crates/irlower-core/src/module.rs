//! The IR arena.
//!
//! [`IrModule`] owns every function and container of a compilation. Containers
//! list their members as [`Declaration`]s that refer back into the arena by id.
//! A function that is dropped from its container's declaration list stays in
//! the arena (ids are never reused) but is no longer part of the program.

use crate::{ContainerId, Expr, Function, FunctionId, LoweringError, Result, ValueId};

/// A class-like scope that owns an ordered list of declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub name: String,
    /// Enclosing container for nested classes.
    pub parent: Option<ContainerId>,
    pub declarations: Vec<Declaration>,
}

/// A member of a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(FunctionId),
    /// A nested container.
    Container(ContainerId),
    Field(Field),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub initializer: Option<Expr>,
}

/// A source file: the unit the phase driver schedules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IrFile {
    pub name: String,
    /// Top-level containers, in declaration order.
    pub containers: Vec<ContainerId>,
}

impl IrFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            containers: Vec::new(),
        }
    }
}

/// Arena of functions and containers.
#[derive(Debug, Clone, Default)]
pub struct IrModule {
    functions: Vec<Function>,
    containers: Vec<Container>,
    next_value: u32,
}

impl IrModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh value slot.
    pub fn fresh_value(&mut self) -> ValueId {
        let id = ValueId::new(self.next_value);
        self.next_value += 1;
        id
    }

    /// Add a container. The caller is responsible for listing it in its
    /// parent's declarations when it is nested.
    pub fn add_container(
        &mut self,
        name: impl Into<String>,
        parent: Option<ContainerId>,
    ) -> ContainerId {
        let id = ContainerId::new(self.containers.len() as u32);
        self.containers.push(Container {
            name: name.into(),
            parent,
            declarations: Vec::new(),
        });
        id
    }

    /// Add a function to the arena without declaring it anywhere.
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    pub fn function(&self, id: FunctionId) -> Result<&Function> {
        self.functions
            .get(id.slot())
            .ok_or(LoweringError::UnknownFunction { id })
    }

    pub fn function_mut(&mut self, id: FunctionId) -> Result<&mut Function> {
        self.functions
            .get_mut(id.slot())
            .ok_or(LoweringError::UnknownFunction { id })
    }

    pub fn container(&self, id: ContainerId) -> Result<&Container> {
        self.containers
            .get(id.slot())
            .ok_or(LoweringError::UnknownContainer { id })
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Result<&mut Container> {
        self.containers
            .get_mut(id.slot())
            .ok_or(LoweringError::UnknownContainer { id })
    }

    /// Number of functions in the arena, declared or not.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Functions declared directly in `container`, in declaration order.
    pub fn declared_functions(
        &self,
        container: ContainerId,
    ) -> Result<impl Iterator<Item = FunctionId> + '_> {
        Ok(self
            .container(container)?
            .declarations
            .iter()
            .filter_map(|decl| match decl {
                Declaration::Function(id) => Some(*id),
                _ => None,
            }))
    }

    /// Find a directly declared function by name.
    pub fn find_declared(&self, container: ContainerId, name: &str) -> Result<Option<FunctionId>> {
        for id in self.declared_functions(container)? {
            if self.function(id)?.name == name {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}
