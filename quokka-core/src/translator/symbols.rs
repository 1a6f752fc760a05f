//! 模块与函数符号表

use crate::bytecode::FunctionSymbol;
use crate::compiler::parser::TypeName;
use crate::types::Type;
use std::collections::HashMap;

/// 模块句柄（符号表内下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(usize);

/// 已声明的函数
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    pub name: String,
    pub return_type_name: TypeName,
    pub args: Vec<(String, TypeName)>,
    /// 泛型参数名与占位类型（按声明顺序）
    pub generics: Vec<(String, Type)>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub symbol: FunctionSymbol,
    pub line: usize,
}

impl FunctionInfo {
    pub fn is_generic(&self) -> bool {
        !self.generics.is_empty()
    }

    pub fn generic_map(&self) -> HashMap<String, Type> {
        self.generics.iter().cloned().collect()
    }

    /// 代入泛型实参后的参数与返回类型
    pub fn instantiate(&self, type_args: &[Type]) -> (Vec<Type>, Type) {
        let params = self
            .params
            .iter()
            .map(|p| p.substitute_generics(type_args))
            .collect();
        (params, self.return_type.substitute_generics(type_args))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInfo {
    pub name: String,
    pub parent: Option<ModuleId>,
    pub functions: Vec<FunctionInfo>,
    pub submodules: Vec<ModuleId>,
    pub imports: Vec<String>,
}

/// 函数查找失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    NotFound,
    WrongArity { expected: usize, found: usize },
}

/// 模块表（arena，父模块以下标引用）
#[derive(Debug, Clone)]
pub struct ModuleTable {
    modules: Vec<ModuleInfo>,
}

impl ModuleTable {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            modules: vec![ModuleInfo {
                name: root_name.into(),
                parent: None,
                functions: Vec::new(),
                submodules: Vec::new(),
                imports: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ModuleId {
        ModuleId(0)
    }

    pub fn add_module(&mut self, name: impl Into<String>, parent: ModuleId) -> ModuleId {
        let id = ModuleId(self.modules.len());
        self.modules.push(ModuleInfo {
            name: name.into(),
            parent: Some(parent),
            functions: Vec::new(),
            submodules: Vec::new(),
            imports: Vec::new(),
        });
        self.modules[parent.0].submodules.push(id);
        id
    }

    pub fn module(&self, id: ModuleId) -> &ModuleInfo {
        &self.modules[id.0]
    }

    /// 祖先模块名以 `.` 连接
    pub fn full_name(&self, id: ModuleId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(module) = current {
            let info = &self.modules[module.0];
            parts.push(info.name.as_str());
            current = info.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    pub fn add_import(&mut self, id: ModuleId, path: impl Into<String>) {
        let path = path.into();
        let imports = &mut self.modules[id.0].imports;
        if !imports.contains(&path) {
            imports.push(path);
        }
    }

    /// 模块及其祖先的导入路径
    pub fn imports(&self, id: ModuleId) -> Vec<String> {
        let mut imports = Vec::new();
        let mut current = Some(id);
        while let Some(module) = current {
            let info = &self.modules[module.0];
            imports.extend(info.imports.iter().cloned());
            current = info.parent;
        }
        imports
    }

    pub fn contains_function(&self, id: ModuleId, name: &str) -> bool {
        self.modules[id.0].functions.iter().any(|f| f.name == name)
    }

    /// 登记函数，重名时返回 `false`
    pub fn add_function(&mut self, id: ModuleId, info: FunctionInfo) -> bool {
        if self.contains_function(id, &info.name) {
            return false;
        }
        self.modules[id.0].functions.push(info);
        true
    }

    /// 按名称查找函数（沿父模块向上），`arity` 给定时检查参数个数
    pub fn find_function(
        &self,
        id: ModuleId,
        name: &str,
        arity: Option<usize>,
    ) -> Result<&FunctionInfo, LookupError> {
        let mut current = Some(id);
        while let Some(module) = current {
            let info = &self.modules[module.0];
            if let Some(function) = info.functions.iter().find(|f| f.name == name) {
                return match arity {
                    Some(found) if found != function.args.len() => Err(LookupError::WrongArity {
                        expected: function.args.len(),
                        found,
                    }),
                    _ => Ok(function),
                };
            }
            current = info.parent;
        }
        Err(LookupError::NotFound)
    }
}
