// ==========================================
// 产品目录导入 - 分隔符文件解析器
// ==========================================
// 格式: 每行一条记录，字段以 '|' 分隔（可配置）
// 规则: 首行为表头，不做校验直接丢弃
// 说明: 源数据不使用引号转义，关闭 quoting；非 UTF-8 字节按有损方式解码
// ==========================================

use crate::config::import_config::DEFAULT_DELIMITER;
use crate::domain::RawCatalogRow;
use crate::importer::catalog_importer_trait::{FileParser, RowStream};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

// ==========================================
// DelimitedFileParser 实现
// ==========================================
pub struct DelimitedFileParser {
    delimiter: u8,
}

impl Default for DelimitedFileParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl DelimitedFileParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// 单行字段拆分配置（行切分由 CatalogLines 负责）
    fn record_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .quoting(false);
        builder
    }
}

impl FileParser for DelimitedFileParser {
    fn open_rows(&self, file_path: &Path) -> ImportResult<RowStream> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        Ok(Box::new(CatalogLines::new(
            BufReader::new(file),
            self.record_builder(),
        )))
    }
}

// ==========================================
// CatalogLines - 按物理行产出数据行
// ==========================================
// 第 1 行无条件视为表头丢弃（即使为空行）
// 空行跳过但计入行号，row_number 始终等于物理行号
// 读取失败产出一次 Err 后结束
struct CatalogLines<B> {
    reader: B,
    builder: ReaderBuilder,
    line_number: usize,
    line: Vec<u8>,
    finished: bool,
}

impl<B: BufRead> CatalogLines<B> {
    fn new(reader: B, builder: ReaderBuilder) -> Self {
        Self {
            reader,
            builder,
            line_number: 0,
            line: Vec::new(),
            finished: false,
        }
    }

    /// 读入下一物理行（去掉 \n 或 \r\n），文件结束返回 false
    fn read_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        while matches!(self.line.last(), Some(b'\n' | b'\r')) {
            self.line.pop();
        }
        Ok(true)
    }

    fn parse_line(&self) -> ImportResult<RawCatalogRow> {
        let mut record = ByteRecord::new();
        self.builder
            .from_reader(self.line.as_slice())
            .read_byte_record(&mut record)?;

        let fields = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        Ok(RawCatalogRow::new(self.line_number, fields))
    }
}

impl<B: BufRead> Iterator for CatalogLines<B> {
    type Item = ImportResult<RawCatalogRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.read_line() {
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                // 表头 / 空行
                Ok(true) if self.line_number == 1 || self.line.is_empty() => continue,
                Ok(true) => return Some(self.parse_line()),
            }
        }
    }
}
