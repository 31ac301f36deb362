//! Shared test support utilities for integration tests

#![allow(dead_code)]

use rulegen_core::TranspileOptions;
use std::path::PathBuf;
use tempfile::TempDir;

/// Entity source matching the examples in the rule documents
pub const TEST_TABLE_1: &str = r#"package jp.example.entity;

import java.io.Serializable;
import java.util.Date;

/**
 * TEST_TABLE_1 base entity
 */
public class TestTable1BaseEntity implements Serializable {

    private static final long serialVersionUID = 1L;

    /**
     * [test_field_1] 生活／仕事　会社コード
     */
    private String testField1;

    /**
     * [test_field_2] 請求 コード
     */
    private Integer testField2;

    /**
     * [test_field_3] 登録 日付
     */
    private Date testField3;

    /**
     * [test_field_4] 件数
     */
    private Long testField4;
}
"#;

pub const DEFINITIONS: &str = r#"public class RuleVariables {
    private String DCompany;
    private Integer DCount = 0;
    private String DName;
    private boolean changed;
}
"#;

/// Temporary workspace with entity and definitions files
pub struct Fixture {
    pub dir: TempDir,
    pub entity: PathBuf,
    pub definitions: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let entity = dir.path().join("TestTable1BaseEntity.java");
        let definitions = dir.path().join("RuleVariables.java");
        std::fs::write(&entity, TEST_TABLE_1).unwrap();
        std::fs::write(&definitions, DEFINITIONS).unwrap();
        Self { dir, entity, definitions }
    }

    /// Options mapping `手袋(Ｌ０１)` to the fixture entity
    pub fn options(&self) -> TranspileOptions {
        TranspileOptions::default().with_entity("手袋(Ｌ０１)", &self.entity)
    }
}
